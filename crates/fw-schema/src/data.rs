//! Seed data for a form.
//!
//! Only absent keys are filled; anything the caller already has is kept, so
//! running the initializer twice yields the same object.

use fw_core::enums::ControlType;
use fw_core::{FieldId, FieldTree, LeafField, NodeKind};
use serde_json::{Map, Value};

/// Merge defaults for every property of `tree` into `existing`.
///
/// A non-object `existing` value is treated as an empty object.
#[must_use]
pub fn initialize_data(tree: &FieldTree, existing: &Value) -> Value {
    let mut data = existing.as_object().cloned().unwrap_or_default();
    fill_level(tree, tree.roots(), &mut data);
    Value::Object(data)
}

fn fill_level(tree: &FieldTree, ids: &[FieldId], data: &mut Map<String, Value>) {
    for node in tree.resolve(ids) {
        match &node.kind {
            NodeKind::Layout(layout) => fill_level(tree, &layout.children, data),
            NodeKind::Leaf(leaf) => {
                data.entry(leaf.key.as_str())
                    .or_insert_with(|| leaf_default(leaf));
            }
            NodeKind::Object(object) => {
                let slot = data
                    .entry(object.key.as_str())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(inner) = slot {
                    fill_level(tree, &object.children, inner);
                }
            }
            NodeKind::Array(array) => {
                let slot = data.entry(array.key.as_str()).or_insert_with(|| {
                    if array.children.is_empty() {
                        Value::Array(Vec::new())
                    } else {
                        Value::Array(vec![Value::Object(Map::new())])
                    }
                });
                if let Value::Array(items) = slot {
                    for item in items.iter_mut() {
                        if let Value::Object(inner) = item {
                            fill_level(tree, &array.children, inner);
                        }
                    }
                }
            }
        }
    }
}

/// Default for one leaf: the schema's own `default` when present, else the
/// first `enum` option, else a zero value for its `type` (falling back to the
/// control kind).
fn leaf_default(leaf: &LeafField) -> Value {
    if let Some(default) = leaf.schema.get("default") {
        return default.clone();
    }
    if let Some(first) = leaf
        .schema
        .get("enum")
        .and_then(Value::as_array)
        .and_then(|options| options.first())
    {
        return first.clone();
    }
    match leaf.schema.get("type").and_then(Value::as_str) {
        Some("boolean") => Value::Bool(false),
        Some("number" | "integer") => Value::from(0),
        Some("array") => Value::Array(Vec::new()),
        Some(_) => Value::from(""),
        None => match leaf.control {
            ControlType::Checkbox | ControlType::Toggle => Value::Bool(false),
            ControlType::Number | ControlType::Integer | ControlType::Slider => Value::from(0),
            ControlType::Multiselect | ControlType::Multicheckbox => Value::Array(Vec::new()),
            _ => Value::from(""),
        },
    }
}
