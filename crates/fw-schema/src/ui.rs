//! Field tree → UI Schema.
//!
//! Mirrors the property structure of [`crate::build_schema`]: layout nodes
//! become layout elements, objects become groups whose controls point one
//! level deeper, arrays become a single control whose `detail` layout uses
//! item-relative scopes.

use fw_config::UiConfig;
use fw_core::enums::{ControlType, LayoutType};
use fw_core::{FieldId, FieldNode, FieldTree, NodeKind};
use serde_json::{Map, Value, json};

use crate::rule::compile_rule;

const ROOT_SCOPE: &str = "#";

/// Build `{type: "VerticalLayout", elements}` for the whole tree.
#[must_use]
pub fn build_ui_schema(tree: &FieldTree, config: &UiConfig) -> Value {
    let builder = UiSchemaBuilder { tree, config };
    json!({
        "type": "VerticalLayout",
        "elements": builder.elements(tree.roots(), ROOT_SCOPE),
    })
}

struct UiSchemaBuilder<'a> {
    tree: &'a FieldTree,
    config: &'a UiConfig,
}

impl UiSchemaBuilder<'_> {
    fn elements(&self, ids: &[FieldId], scope: &str) -> Vec<Value> {
        let mut elements = Vec::with_capacity(ids.len());
        for node in self.tree.resolve(ids) {
            let rule = compile_rule(&node.visibility, node.effect);
            for mut element in self.node_elements(node, scope) {
                if let (Some(rule), Value::Object(map)) = (&rule, &mut element) {
                    map.insert("rule".into(), rule.clone());
                }
                elements.push(element);
            }
        }
        elements
    }

    /// One element per node, except a confirmed password which yields two.
    fn node_elements(&self, node: &FieldNode, scope: &str) -> Vec<Value> {
        match &node.kind {
            NodeKind::Layout(layout) => {
                let mut element = Map::new();
                element.insert("type".into(), Value::from(layout.layout.ui_element()));
                if layout.layout == LayoutType::Group {
                    element.insert("label".into(), Value::from(node.label.as_str()));
                    let icon = node
                        .ui_options
                        .icon
                        .as_ref()
                        .or(self.config.default_group_icon.as_ref());
                    if let Some(icon) = icon {
                        element.insert("options".into(), json!({ "icon": icon }));
                    }
                }
                element.insert(
                    "elements".into(),
                    Value::Array(self.elements(&layout.children, scope)),
                );
                vec![Value::Object(element)]
            }
            NodeKind::Leaf(leaf) => {
                let primary = control(
                    &property_scope(scope, &leaf.key),
                    &node.label,
                    node.ui_options.element_options(),
                );
                if leaf.control == ControlType::Password && node.ui_options.confirm {
                    let key = format!("{}{}", leaf.key, self.config.confirm_suffix);
                    let label = format!("{}{}", self.config.confirm_label_prefix, node.label);
                    let confirm = control(
                        &property_scope(scope, &key),
                        &label,
                        node.ui_options.element_options(),
                    );
                    vec![primary, confirm]
                } else {
                    vec![primary]
                }
            }
            NodeKind::Object(object) => {
                let nested = property_scope(scope, &object.key);
                vec![json!({
                    "type": "Group",
                    "label": node.label,
                    "elements": self.elements(&object.children, &nested),
                })]
            }
            NodeKind::Array(array) => {
                let mut options = node.ui_options.element_options();
                if !array.children.is_empty() {
                    options.insert(
                        "detail".into(),
                        json!({
                            "type": "VerticalLayout",
                            "elements": self.elements(&array.children, ROOT_SCOPE),
                        }),
                    );
                }
                vec![control(
                    &property_scope(scope, &array.key),
                    &node.label,
                    options,
                )]
            }
        }
    }
}

fn property_scope(scope: &str, key: &str) -> String {
    format!("{scope}/properties/{key}")
}

fn control(scope: &str, label: &str, options: Map<String, Value>) -> Value {
    let mut element = Map::new();
    element.insert("type".into(), Value::from("Control"));
    element.insert("scope".into(), Value::from(scope));
    element.insert("label".into(), Value::from(label));
    if !options.is_empty() {
        element.insert("options".into(), Value::Object(options));
    }
    Value::Object(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(nested: Value) -> Value {
        let tree: FieldTree = serde_json::from_value(nested).unwrap();
        build_ui_schema(&tree, &UiConfig::default())
    }

    #[test]
    fn leaves_become_controls() {
        let ui = build(json!([
            {"id": "a", "type": "text", "key": "name", "label": "Name"},
            {"id": "b", "type": "textarea", "key": "bio", "label": "Bio",
             "uiOptions": {"multi": true, "readonly": true}}
        ]));
        assert_eq!(
            ui,
            json!({
                "type": "VerticalLayout",
                "elements": [
                    {"type": "Control", "scope": "#/properties/name", "label": "Name"},
                    {"type": "Control", "scope": "#/properties/bio", "label": "Bio",
                     "options": {"readonly": true, "multi": true}}
                ]
            })
        );
    }

    #[test]
    fn layouts_and_groups_keep_structure() {
        let ui = build(json!([
            {"id": "g", "type": "group", "label": "Contact", "uiOptions": {"icon": "mail"},
             "children": [
                {"id": "h", "type": "horizontal-layout", "children": [
                    {"id": "a", "type": "email", "key": "email", "label": "Email"}
                ]}
            ]}
        ]));
        assert_eq!(
            ui["elements"][0],
            json!({
                "type": "Group",
                "label": "Contact",
                "options": {"icon": "mail"},
                "elements": [
                    {"type": "HorizontalLayout", "elements": [
                        {"type": "Control", "scope": "#/properties/email", "label": "Email"}
                    ]}
                ]
            })
        );
    }

    #[test]
    fn default_group_icon_applies_when_unset() {
        let tree: FieldTree = serde_json::from_value(json!([
            {"id": "g", "type": "group", "label": "G", "children": []}
        ]))
        .unwrap();
        let config = UiConfig {
            default_group_icon: Some("folder".into()),
            ..UiConfig::default()
        };
        let ui = build_ui_schema(&tree, &config);
        assert_eq!(ui["elements"][0]["options"], json!({"icon": "folder"}));
    }

    #[test]
    fn objects_scope_one_level_deeper() {
        let ui = build(json!([
            {"id": "o", "type": "object", "key": "address", "label": "Address", "children": [
                {"id": "v", "type": "vertical-layout", "children": [
                    {"id": "s", "type": "text", "key": "street", "label": "Street"}
                ]}
            ]}
        ]));
        assert_eq!(ui["elements"][0]["type"], json!("Group"));
        assert_eq!(ui["elements"][0]["label"], json!("Address"));
        assert_eq!(
            ui["elements"][0]["elements"][0]["elements"][0]["scope"],
            json!("#/properties/address/properties/street")
        );
    }

    #[test]
    fn arrays_get_item_relative_detail() {
        let ui = build(json!([
            {"id": "p", "type": "array", "key": "pets", "label": "Pets", "children": [
                {"id": "n", "type": "text", "key": "name", "label": "Name"}
            ]},
            {"id": "t", "type": "array", "key": "tags", "label": "Tags"}
        ]));
        assert_eq!(
            ui["elements"][0],
            json!({
                "type": "Control",
                "scope": "#/properties/pets",
                "label": "Pets",
                "options": {"detail": {"type": "VerticalLayout", "elements": [
                    {"type": "Control", "scope": "#/properties/name", "label": "Name"}
                ]}}
            })
        );
        assert!(ui["elements"][1].get("options").is_none());
    }

    #[test]
    fn confirmed_password_adds_twin_control_sharing_rule() {
        let ui = build(json!([
            {"id": "s", "type": "checkbox", "key": "secure", "label": "Secure"},
            {"id": "p", "type": "password", "key": "pw", "label": "Password",
             "uiOptions": {"format": "password", "confirm": true},
             "visibility": [{"dependsOnKey": "secure", "operator": "equals", "value": true}]}
        ]));
        let elements = ui["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2]["scope"], json!("#/properties/pw_confirm"));
        assert_eq!(elements[2]["label"], json!("Confirm Password"));
        assert_eq!(elements[2]["options"], json!({"format": "password"}));
        assert!(elements[1].get("rule").is_some());
        assert_eq!(elements[1]["rule"], elements[2]["rule"]);
        assert!(elements[0].get("rule").is_none());
    }

    #[test]
    fn unconfirmed_password_is_a_single_control() {
        let ui = build(json!([
            {"id": "p", "type": "password", "key": "pw", "label": "Password"}
        ]));
        assert_eq!(ui["elements"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn rules_attach_to_layouts_too() {
        let ui = build(json!([
            {"id": "a", "type": "number", "key": "age", "label": "Age"},
            {"id": "g", "type": "vertical-layout", "effect": "HIDE",
             "visibility": [{"dependsOnKey": "age", "operator": "lt", "value": "18"}],
             "children": []}
        ]));
        assert_eq!(ui["elements"][1]["rule"]["effect"], json!("HIDE"));
        assert_eq!(
            ui["elements"][1]["rule"]["condition"]["schema"]["properties"]["age"],
            json!({"type": "number", "exclusiveMaximum": 18})
        );
    }
}
