//! Attribute projection and redaction over JSON-shaped values.
//!
//! Include patterns are resolved by recursive descent: a pattern may anchor
//! at any node of the value, after which its segments walk strictly
//! downward. Every matched subtree is grafted onto a minimal skeleton;
//! exclude patterns are then resolved against that skeleton and pruned out.
//! Paths that match nothing contribute nothing.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{AttributeSet, PathPattern, Segment};

/// One concrete step in a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PathKey {
    Key(String),
    Index(usize),
}

/// Apply `attributes` to `data`, returning the visible view.
pub(crate) fn apply(attributes: &AttributeSet, data: &Value) -> Value {
    let include_all = attributes.contains_all();
    if include_all && !attributes.has_exclusions() {
        return data.clone();
    }

    let mut included = if include_all {
        data.clone()
    } else {
        let mut skeleton = Skeleton::for_value(data);
        for pattern in attributes.includes() {
            for path in resolve_paths(pattern, data) {
                if let Some(value) = value_at(data, &path) {
                    skeleton.graft(&path, value);
                }
            }
        }
        skeleton.render()
    };

    let mut pruned: Vec<Vec<PathKey>> = Vec::new();
    for pattern in attributes.excludes() {
        pruned.extend(resolve_paths(pattern, &included));
    }
    // Descending order: array removals must not shift paths still pending.
    pruned.sort_unstable();
    pruned.dedup();
    for path in pruned.iter().rev() {
        remove_at(&mut included, path);
    }
    included
}

/// All concrete paths in `data` matched by `pattern`, in document order.
fn resolve_paths(pattern: &PathPattern, data: &Value) -> Vec<Vec<PathKey>> {
    let mut matches = Vec::new();
    let mut prefix = Vec::new();
    descend(data, &mut prefix, &mut |node, anchor| {
        match_segments(node, pattern.segments(), anchor, &mut matches);
    });
    matches
}

/// Preorder walk handing every node (root included) to `visit`.
fn descend(node: &Value, path: &mut Vec<PathKey>, visit: &mut impl FnMut(&Value, &[PathKey])) {
    visit(node, path);
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(PathKey::Key(key.clone()));
                descend(child, path, visit);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(PathKey::Index(index));
                descend(child, path, visit);
                path.pop();
            }
        }
        _ => {}
    }
}

/// Walk `segments` strictly downward from `node`, recording the full path
/// of every complete match.
fn match_segments(
    node: &Value,
    segments: &[Segment],
    prefix: &[PathKey],
    out: &mut Vec<Vec<PathKey>>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let matched = match segment {
                    Segment::Any => true,
                    Segment::Key(k) => k == key,
                };
                if !matched {
                    continue;
                }
                let mut path = prefix.to_vec();
                path.push(PathKey::Key(key.clone()));
                if rest.is_empty() {
                    out.push(path);
                } else {
                    match_segments(child, rest, &path, out);
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let matched = match segment {
                    Segment::Any => true,
                    Segment::Key(k) => k.parse::<usize>() == Ok(index),
                };
                if !matched {
                    continue;
                }
                let mut path = prefix.to_vec();
                path.push(PathKey::Index(index));
                if rest.is_empty() {
                    out.push(path);
                } else {
                    match_segments(child, rest, &path, out);
                }
            }
        }
        _ => {}
    }
}

fn value_at<'a>(data: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    let mut node = data;
    for key in path {
        node = match (node, key) {
            (Value::Object(map), PathKey::Key(k)) => map.get(k)?,
            (Value::Array(items), PathKey::Index(i)) => items.get(*i)?,
            _ => return None,
        };
    }
    Some(node)
}

fn remove_at(value: &mut Value, path: &[PathKey]) {
    match path {
        [] => {}
        [last] => match (value, last) {
            (Value::Object(map), PathKey::Key(k)) => {
                map.remove(k);
            }
            (Value::Array(items), PathKey::Index(i)) if *i < items.len() => {
                items.remove(*i);
            }
            _ => {}
        },
        [head, rest @ ..] => {
            let child = match (value, head) {
                (Value::Object(map), PathKey::Key(k)) => map.get_mut(k),
                (Value::Array(items), PathKey::Index(i)) => items.get_mut(*i),
                _ => None,
            };
            if let Some(child) = child {
                remove_at(child, rest);
            }
        }
    }
}

/// Partial tree assembled from matched paths. Arrays render compacted, in
/// index order; JSON has no holes.
enum Skeleton {
    /// A whole included subtree.
    Leaf(Value),
    Object(BTreeMap<String, Skeleton>),
    Array(BTreeMap<usize, Skeleton>),
}

impl Skeleton {
    /// Empty skeleton matching the top-level shape of `value`.
    fn for_value(value: &Value) -> Self {
        match value {
            Value::Array(_) => Skeleton::Array(BTreeMap::new()),
            _ => Skeleton::Object(BTreeMap::new()),
        }
    }

    fn graft(&mut self, path: &[PathKey], value: &Value) {
        match path {
            [] => *self = Skeleton::Leaf(value.clone()),
            [head, rest @ ..] => self.child(head).graft(rest, value),
        }
    }

    fn child(&mut self, key: &PathKey) -> &mut Skeleton {
        // An already-grafted subtree is exploded one level so a deeper
        // graft can merge into it instead of being clobbered.
        if let Skeleton::Leaf(value) = &*self {
            let exploded = Skeleton::explode(value);
            *self = exploded;
        }
        match key {
            PathKey::Key(k) => {
                if !matches!(self, Skeleton::Object(_)) {
                    *self = Skeleton::Object(BTreeMap::new());
                }
                match self {
                    Skeleton::Object(map) => map
                        .entry(k.clone())
                        .or_insert_with(|| Skeleton::Object(BTreeMap::new())),
                    _ => unreachable!("just replaced with an object node"),
                }
            }
            PathKey::Index(i) => {
                if !matches!(self, Skeleton::Array(_)) {
                    *self = Skeleton::Array(BTreeMap::new());
                }
                match self {
                    Skeleton::Array(map) => map
                        .entry(*i)
                        .or_insert_with(|| Skeleton::Object(BTreeMap::new())),
                    _ => unreachable!("just replaced with an array node"),
                }
            }
        }
    }

    fn explode(value: &Value) -> Skeleton {
        match value {
            Value::Object(map) => Skeleton::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Skeleton::Leaf(v.clone())))
                    .collect(),
            ),
            Value::Array(items) => Skeleton::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i, Skeleton::Leaf(v.clone())))
                    .collect(),
            ),
            other => Skeleton::Leaf(other.clone()),
        }
    }

    fn render(self) -> Value {
        match self {
            Skeleton::Leaf(value) => value,
            Skeleton::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, node)| (key, node.render()))
                    .collect(),
            ),
            Skeleton::Array(map) => {
                Value::Array(map.into_values().map(Skeleton::render).collect())
            }
        }
    }
}
