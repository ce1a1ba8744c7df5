use serde_json::{Value, json};
use yare::parameterized;

use super::*;
use crate::error::AccessError;

mod inheritance;

fn grants(table: Value) -> GrantTable {
    serde_json::from_value(table).expect("grant table fixture")
}

fn roles_of(principal: &Value) -> Vec<String> {
    principal["roles"]
        .as_array()
        .map(|roles| {
            roles
                .iter()
                .filter_map(|role| role.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn engine(table: Value) -> AccessEngine {
    AccessEngine::new(grants(table), EngineOptions::new(roles_of)).expect("engine fixture")
}

fn book() -> Value {
    json!({"id": 1, "ownerId": 1, "title": "The Firm", "author": "John Grisham"})
}

fn user() -> Value {
    json!({"id": 1, "roles": ["user"]})
}

#[test]
fn create_engine_from_empty_table() {
    let engine = engine(json!({}));
    let decision = engine.can(&user()).read(&book(), "books").unwrap();
    assert!(!decision.granted());
}

#[test]
fn basic_any_grant() {
    let engine = engine(json!({
        "user": {"books": {"read:any": ["*"]}}
    }));

    let decision = engine.can(&user()).read(&book(), "books").unwrap();
    assert!(decision.granted());
    assert_eq!(decision.attributes().tokens(), vec!["*"]);
    assert_eq!(decision.filter(&book()), book());
}

#[test]
fn own_grant_without_predicate_denies() {
    let engine = engine(json!({
        "user": {"books": {"read:own": ["*"]}}
    }));

    let decision = engine.can(&user()).read(&book(), "books").unwrap();
    assert!(!decision.granted());
    assert!(decision.attributes().is_empty());
    assert_eq!(decision.filter(&book()), json!({}));
}

#[test]
fn own_grant_with_owner_predicate() {
    let engine = AccessEngine::new(
        grants(json!({
            "user": {"books": {"create:own": ["*"]}}
        })),
        EngineOptions::new(roles_of)
            .with_ownership("books", |principal, book| book["ownerId"] == principal["id"]),
    )
    .unwrap();

    let owner = json!({"id": 1, "roles": ["user"]});
    let decision = engine.can(&owner).create(&book(), "books").unwrap();
    assert!(decision.granted());
    assert_eq!(decision.attributes().tokens(), vec!["*"]);
    assert_eq!(decision.filter(&book()), book());

    let stranger = json!({"id": 2, "roles": ["user"]});
    let decision = engine.can(&stranger).create(&book(), "books").unwrap();
    assert!(!decision.granted());
}

#[test]
fn multiple_roles_union_their_grants() {
    let engine = engine(json!({
        "user": {"books": {"create:any": ["title", "author"]}},
        "admin": {"books": {"create:any": ["id"]}},
    }));

    let principal = json!({"id": 1, "roles": ["user", "admin"]});
    let decision = engine.can(&principal).create(&book(), "books").unwrap();
    assert!(decision.granted());
    assert_eq!(decision.attributes().tokens(), vec!["author", "id", "title"]);
    assert_eq!(
        decision.filter(&book()),
        json!({"id": 1, "title": "The Firm", "author": "John Grisham"})
    );
}

#[test]
fn asterisk_from_any_role_collapses_the_union() {
    let engine = engine(json!({
        "user": {"books": {"create:any": ["title", "author"]}},
        "admin": {"books": {"create:any": ["*"]}},
    }));

    let principal = json!({"id": 1, "roles": ["user", "admin"]});
    let decision = engine.can(&principal).create(&book(), "books").unwrap();
    assert!(decision.granted());
    assert_eq!(decision.attributes().tokens(), vec!["*"]);
    assert_eq!(decision.filter(&book()), book());
}

#[parameterized(
    create = { "create" },
    read = { "read" },
    update = { "update" },
    delete = { "delete" },
)]
fn ungranted_action_denies(action: &str) {
    let engine = engine(json!({
        "user": {"movies": {"read:any": ["*"]}}
    }));

    let principal = user();
    let query = engine.can(&principal);
    let decision = match action {
        "create" => query.create(&book(), "books"),
        "read" => query.read(&book(), "books"),
        "update" => query.update(&book(), "books"),
        "delete" => query.delete(&book(), "books"),
        _ => unreachable!(),
    }
    .unwrap();
    assert!(!decision.granted());
    assert!(decision.attributes().is_empty());
}

#[test]
fn decision_carries_query_metadata() {
    let engine = engine(json!({
        "user": {"books": {"read:any": ["title"]}}
    }));

    let principal = json!({"id": 1, "roles": ["user", "editor", "user"]});
    let decision = engine.can(&principal).read(&book(), "books").unwrap();
    assert_eq!(decision.action(), Action::Read);
    assert_eq!(decision.resource_type(), "books");
    // Duplicate roles are treated as a set; order of first sight is kept.
    assert_eq!(decision.roles(), ["user", "editor"]);
}

#[test]
fn unknown_role_contributes_nothing() {
    let engine = engine(json!({
        "user": {"books": {"read:any": ["title"]}}
    }));

    let principal = json!({"id": 1, "roles": ["ghost", "user"]});
    let decision = engine.can(&principal).read(&book(), "books").unwrap();
    assert!(decision.granted());
    assert_eq!(decision.attributes().tokens(), vec!["title"]);
}
