//! Field-type registry: the palette of types a user can drop into a form.
//!
//! Each entry carries the schema fragment and presentation defaults a freshly
//! inserted node starts with. Order is significant: it is the palette order,
//! and the importer picks the first matching entry when mapping a primitive
//! JSON Schema type back to a control.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::enums::{ContainerType, ControlType, FieldType, LayoutType};
use crate::node::UiOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeDef {
    pub id: FieldType,
    pub is_layout: bool,
    pub default_schema: Map<String, Value>,
    pub default_ui_options: UiOptions,
    pub label: String,
}

impl FieldTypeDef {
    #[must_use]
    pub fn new(id: impl Into<FieldType>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            id,
            is_layout: id.is_layout(),
            default_schema: Map::new(),
            default_ui_options: UiOptions::default(),
            label: label.into(),
        }
    }

    #[must_use]
    pub fn schema(mut self, schema: Value) -> Self {
        if let Value::Object(map) = schema {
            self.default_schema = map;
        }
        self
    }

    #[must_use]
    pub fn ui(mut self, ui_options: UiOptions) -> Self {
        self.default_ui_options = ui_options;
        self
    }

    fn schema_str(&self, name: &str) -> Option<&str> {
        self.default_schema.get(name).and_then(Value::as_str)
    }

    fn has_enum(&self) -> bool {
        self.default_schema.contains_key("enum")
            || self
                .default_schema
                .get("items")
                .is_some_and(|items| items.get("enum").is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTypeRegistry {
    types: Vec<FieldTypeDef>,
}

fn ui_format(format: &str) -> UiOptions {
    UiOptions {
        format: Some(format.to_string()),
        ..UiOptions::default()
    }
}

impl FieldTypeRegistry {
    /// An empty registry. Lookups fall back to nothing; see [`Self::builtin`].
    #[must_use]
    pub const fn empty() -> Self {
        Self { types: Vec::new() }
    }

    /// The default palette.
    #[must_use]
    pub fn builtin() -> Self {
        let options = json!(["Option 1", "Option 2", "Option 3"]);
        let types = vec![
            FieldTypeDef::new(ControlType::Text, "Text").schema(json!({"type": "string"})),
            FieldTypeDef::new(ControlType::Textarea, "Text Area")
                .schema(json!({"type": "string"}))
                .ui(UiOptions {
                    multi: true,
                    ..UiOptions::default()
                }),
            FieldTypeDef::new(ControlType::Email, "Email")
                .schema(json!({"type": "string", "format": "email"})),
            FieldTypeDef::new(ControlType::Url, "URL")
                .schema(json!({"type": "string", "format": "uri"})),
            FieldTypeDef::new(ControlType::Phone, "Phone").schema(json!({"type": "string"})),
            FieldTypeDef::new(ControlType::Password, "Password")
                .schema(json!({"type": "string", "minLength": 8}))
                .ui(ui_format("password")),
            FieldTypeDef::new(ControlType::Number, "Number").schema(json!({"type": "number"})),
            FieldTypeDef::new(ControlType::Integer, "Integer").schema(json!({"type": "integer"})),
            FieldTypeDef::new(ControlType::Slider, "Slider")
                .schema(json!({"type": "number", "minimum": 0, "maximum": 100, "default": 0}))
                .ui(UiOptions {
                    extra: Map::from_iter([("slider".to_string(), Value::Bool(true))]),
                    ..UiOptions::default()
                }),
            FieldTypeDef::new(ControlType::Date, "Date")
                .schema(json!({"type": "string", "format": "date"})),
            FieldTypeDef::new(ControlType::Time, "Time")
                .schema(json!({"type": "string", "format": "time"})),
            FieldTypeDef::new(ControlType::Datetime, "Date & Time")
                .schema(json!({"type": "string", "format": "date-time"})),
            FieldTypeDef::new(ControlType::Checkbox, "Checkbox").schema(json!({"type": "boolean"})),
            FieldTypeDef::new(ControlType::Toggle, "Toggle")
                .schema(json!({"type": "boolean"}))
                .ui(UiOptions {
                    toggle: true,
                    ..UiOptions::default()
                }),
            FieldTypeDef::new(ControlType::Radio, "Radio Group")
                .schema(json!({"type": "string", "enum": ["Option 1", "Option 2"]}))
                .ui(ui_format("radio")),
            FieldTypeDef::new(ControlType::Select, "Dropdown")
                .schema(json!({"type": "string", "enum": options})),
            FieldTypeDef::new(ControlType::Multiselect, "Multi Select")
                .schema(json!({
                    "type": "array",
                    "uniqueItems": true,
                    "items": {"type": "string", "enum": options}
                }))
                .ui(UiOptions {
                    multi: true,
                    ..UiOptions::default()
                }),
            FieldTypeDef::new(ControlType::Multicheckbox, "Checkbox Group")
                .schema(json!({
                    "type": "array",
                    "uniqueItems": true,
                    "items": {"type": "string", "enum": options}
                }))
                .ui(ui_format("checkbox")),
            FieldTypeDef::new(ControlType::File, "File Upload")
                .schema(json!({"type": "string", "format": "data-url"})),
            FieldTypeDef::new(LayoutType::Vertical, "Vertical Layout"),
            FieldTypeDef::new(LayoutType::Horizontal, "Horizontal Layout"),
            FieldTypeDef::new(LayoutType::Group, "Group"),
            FieldTypeDef::new(ContainerType::Object, "Object"),
            FieldTypeDef::new(ContainerType::Array, "Repeating Section"),
        ];
        Self { types }
    }

    /// Add or replace an entry, keeping palette order for replacements.
    #[must_use]
    pub fn with(mut self, def: FieldTypeDef) -> Self {
        match self.types.iter_mut().find(|t| t.id == def.id) {
            Some(slot) => *slot = def,
            None => self.types.push(def),
        }
        self
    }

    #[must_use]
    pub fn get(&self, id: FieldType) -> Option<&FieldTypeDef> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldTypeDef> {
        self.types.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// First enum-free control whose default schema has this `type` and
    /// `format` (both compared exactly; `None` matches only a missing format).
    #[must_use]
    pub fn match_primitive(&self, schema_type: &str, format: Option<&str>) -> Option<ControlType> {
        self.types.iter().find_map(|def| match def.id {
            FieldType::Control(control)
                if !def.has_enum()
                    && def.schema_str("type") == Some(schema_type)
                    && def.schema_str("format") == format =>
            {
                Some(control)
            }
            _ => None,
        })
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_field_type() {
        let registry = FieldTypeRegistry::builtin();
        for control in ControlType::ALL {
            assert!(registry.get(control.into()).is_some(), "missing {control}");
        }
        assert!(registry.get(LayoutType::Group.into()).unwrap().is_layout);
        assert!(!registry.get(FieldType::ARRAY).unwrap().is_layout);
        assert_eq!(registry.len(), ControlType::ALL.len() + 5);
    }

    #[test]
    fn match_primitive_prefers_palette_order() {
        let registry = FieldTypeRegistry::builtin();
        assert_eq!(registry.match_primitive("string", None), Some(ControlType::Text));
        assert_eq!(registry.match_primitive("number", None), Some(ControlType::Number));
        assert_eq!(registry.match_primitive("boolean", None), Some(ControlType::Checkbox));
        assert_eq!(
            registry.match_primitive("string", Some("date-time")),
            Some(ControlType::Datetime)
        );
        assert_eq!(registry.match_primitive("string", Some("ipv4")), None);
    }

    #[test]
    fn with_replaces_in_place() {
        let registry = FieldTypeRegistry::builtin().with(
            FieldTypeDef::new(ControlType::Text, "Short Text")
                .schema(json!({"type": "string", "maxLength": 80})),
        );
        let first = registry.iter().next().unwrap();
        assert_eq!(first.label, "Short Text");
        assert_eq!(registry.len(), FieldTypeRegistry::builtin().len());
    }

    #[test]
    fn empty_registry_matches_nothing() {
        let registry = FieldTypeRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.match_primitive("string", None), None);
    }
}
