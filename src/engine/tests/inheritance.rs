use std::collections::HashMap;

use serde_json::{Value, json};

use super::*;

fn inheritance(edges: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    edges
        .iter()
        .map(|(super_role, sub_roles)| {
            (
                super_role.to_string(),
                sub_roles.iter().map(|r| r.to_string()).collect(),
            )
        })
        .collect()
}

fn library_table() -> Value {
    json!({
        "reader": {"books": {"read:any": ["title", "author"]}},
        "editor": {"books": {"update:any": ["title"]}},
    })
}

#[test]
fn inheritance_applies_at_construction() {
    let engine = AccessEngine::new(
        grants(library_table()),
        EngineOptions::new(roles_of).with_inheritance(inheritance(&[("editor", &["reader"])])),
    )
    .unwrap();

    let editor = json!({"id": 1, "roles": ["editor"]});
    let decision = engine.can(&editor).read(&book(), "books").unwrap();
    assert!(decision.granted());
    assert_eq!(decision.attributes().tokens(), vec!["author", "title"]);
}

#[test]
fn inheritance_chains_are_transitive() {
    let mut engine = engine(library_table());
    engine
        .add_role_inheritance(inheritance(&[("editor", &["reader"])]))
        .unwrap();
    engine
        .add_role_inheritance(inheritance(&[("chief", &["editor"])]))
        .unwrap();

    let chief = json!({"id": 1, "roles": ["chief"]});
    let read = engine.can(&chief).read(&book(), "books").unwrap();
    assert_eq!(read.attributes().tokens(), vec!["author", "title"]);
    let update = engine.can(&chief).update(&book(), "books").unwrap();
    assert_eq!(update.attributes().tokens(), vec!["title"]);
}

#[test]
fn repeated_registration_is_idempotent() {
    let mut engine = engine(library_table());
    let map = inheritance(&[("editor", &["reader"])]);
    engine.add_role_inheritance(map.clone()).unwrap();
    engine.add_role_inheritance(map).unwrap();

    let editor = json!({"id": 1, "roles": ["editor"]});
    let decision = engine.can(&editor).read(&book(), "books").unwrap();
    assert_eq!(decision.attributes().tokens(), vec!["author", "title"]);
}

#[test]
fn cycles_are_a_configuration_error() {
    let mut engine = engine(library_table());
    engine
        .add_role_inheritance(inheritance(&[("editor", &["reader"])]))
        .unwrap();
    let err = engine
        .add_role_inheritance(inheritance(&[("reader", &["editor"])]))
        .unwrap_err();
    assert!(matches!(err, AccessError::InheritanceCycle(_)));
}

#[test]
fn cycle_at_construction_fails_engine_build() {
    let result = AccessEngine::new(
        grants(library_table()),
        EngineOptions::new(roles_of).with_inheritance(inheritance(&[("reader", &["reader"])])),
    );
    assert!(matches!(result, Err(AccessError::InheritanceCycle(_))));
}

#[test]
fn inherited_grants_union_with_own_grants() {
    let engine = AccessEngine::new(
        grants(json!({
            "reader": {"books": {"read:any": ["title"]}},
            "editor": {"books": {"read:any": ["notes"]}},
        })),
        EngineOptions::new(roles_of).with_inheritance(inheritance(&[("editor", &["reader"])])),
    )
    .unwrap();

    let editor = json!({"id": 1, "roles": ["editor"]});
    let decision = engine.can(&editor).read(&book(), "books").unwrap();
    assert_eq!(decision.attributes().tokens(), vec!["notes", "title"]);
}
