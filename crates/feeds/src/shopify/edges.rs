//! Recursive flattening of GraphQL edge/node envelopes.

use serde_json::Value;

/// Replace every `{edges: [{node: ...}]}` envelope found anywhere in `value`
/// with the plain ordered list of its node values.
///
/// GraphQL connection objects wrap each item in an `edges` entry alongside
/// `pageInfo`; import tools want flat arrays. The check applies to the
/// members of objects and the elements of arrays, at any depth, so nested
/// connections (e.g., a variant's parent product) flatten too. Scalars pass
/// through unchanged, an empty `edges` list becomes an empty list, and the
/// traversal is idempotent on already-flat input. Responses are trees, never
/// graphs, so no cycle handling is needed.
#[must_use]
pub fn flatten_edges(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (key, flatten_edges(unwrap_connection(val))))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| flatten_edges(unwrap_connection(item)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// If `value` is a connection object (an object with an `edges` array),
/// extract the ordered `node` list; otherwise pass it through.
///
/// `pageInfo` and any sibling members are dropped along with the envelope.
fn unwrap_connection(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    match map.remove("edges") {
        Some(Value::Array(edges)) => Value::Array(edges.into_iter().map(node_of).collect()),
        Some(other) => {
            // An `edges` member that is not an array is not a connection
            map.insert("edges".to_string(), other);
            Value::Object(map)
        }
        None => Value::Object(map),
    }
}

fn node_of(edge: Value) -> Value {
    match edge {
        Value::Object(mut map) => map.remove("node").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
