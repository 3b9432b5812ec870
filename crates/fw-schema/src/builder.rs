//! Field tree → JSON Schema.
//!
//! Layouts are transparent: their children are spliced into the enclosing
//! property level. Objects open exactly one nested level, arrays describe
//! their item shape once through `items`.

use fw_core::{FieldId, FieldTree, NodeKind};
use serde_json::{Map, Value};

/// Build `{type: "object", properties, required?}` for the whole tree.
#[must_use]
pub fn build_schema(tree: &FieldTree) -> Value {
    Value::Object(object_schema(tree, tree.roots(), None))
}

fn object_schema(tree: &FieldTree, ids: &[FieldId], title: Option<&str>) -> Map<String, Value> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    collect_level(tree, ids, &mut properties, &mut required);

    let mut schema = Map::new();
    schema.insert("type".into(), Value::from("object"));
    if let Some(title) = title {
        schema.insert("title".into(), Value::from(title));
    }
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}

fn collect_level(
    tree: &FieldTree,
    ids: &[FieldId],
    properties: &mut Map<String, Value>,
    required: &mut Vec<Value>,
) {
    for node in tree.resolve(ids) {
        let (key, schema) = match &node.kind {
            NodeKind::Layout(layout) => {
                collect_level(tree, &layout.children, properties, required);
                continue;
            }
            NodeKind::Leaf(leaf) => {
                let mut schema = leaf.schema.clone();
                schema.insert("title".into(), Value::from(node.label.as_str()));
                (&leaf.key, schema)
            }
            NodeKind::Object(object) => (
                &object.key,
                object_schema(tree, &object.children, Some(node.label.as_str())),
            ),
            NodeKind::Array(array) => {
                let mut schema = Map::new();
                schema.insert("type".into(), Value::from("array"));
                schema.insert("title".into(), Value::from(node.label.as_str()));
                schema.insert("uniqueItems".into(), Value::Bool(true));
                for (k, v) in array.schema.iter().filter(|(k, _)| k.as_str() != "type") {
                    schema.insert(k.clone(), v.clone());
                }
                if !array.children.is_empty() {
                    schema.insert(
                        "items".into(),
                        Value::Object(object_schema(tree, &array.children, None)),
                    );
                }
                (&array.key, schema)
            }
        };
        if node.required() {
            required.push(Value::from(key.as_str()));
        }
        properties.insert(key.clone(), Value::Object(schema));
    }
}
