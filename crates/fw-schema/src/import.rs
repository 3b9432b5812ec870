//! JSON Schema → field tree.
//!
//! The inverse of [`crate::build_schema`], driven by heuristics: enum length
//! picks radio or select, a key hint picks checkbox groups, `type`/`format`
//! pick the control through the field-type registry. Round-tripping a tree
//! of unambiguous leaves reproduces the same schema, not necessarily the same
//! controls.

use fw_config::ImportConfig;
use fw_core::enums::{ContainerType, ControlType, Effect, FieldType, LayoutType};
use fw_core::{FieldId, FieldTree, FieldTypeRegistry, IdGenerator, NestedField, UiOptions};
use serde_json::{Map, Value};

use crate::error::SchemaError;

pub struct SchemaImporter<'a> {
    registry: &'a FieldTypeRegistry,
    config: &'a ImportConfig,
}

impl<'a> SchemaImporter<'a> {
    #[must_use]
    pub const fn new(registry: &'a FieldTypeRegistry, config: &'a ImportConfig) -> Self {
        Self { registry, config }
    }

    /// Convert a JSON Schema root into a tree, minting every id from `ids`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidSchema` when the root is not a JSON object,
    /// `SchemaError::MissingProperties` when it has no `properties` object, and
    /// `SchemaError::Core` when the imported tree fails validation.
    pub fn import(
        &self,
        schema: &Value,
        ids: &mut dyn IdGenerator,
    ) -> Result<FieldTree, SchemaError> {
        let root = schema
            .as_object()
            .ok_or_else(|| SchemaError::InvalidSchema("root must be a JSON object".into()))?;
        let properties = root
            .get("properties")
            .and_then(Value::as_object)
            .ok_or(SchemaError::MissingProperties)?;
        let fields = self.import_properties(properties, &required_keys(root), ids);
        Ok(FieldTree::from_nested(fields)?)
    }

    fn import_properties(
        &self,
        properties: &Map<String, Value>,
        required: &[&str],
        ids: &mut dyn IdGenerator,
    ) -> Vec<NestedField> {
        properties
            .iter()
            .map(|(key, property)| {
                self.import_property(key, property, required.contains(&key.as_str()), ids)
            })
            .collect()
    }

    fn import_property(
        &self,
        key: &str,
        property: &Value,
        required: bool,
        ids: &mut dyn IdGenerator,
    ) -> NestedField {
        let empty = Map::new();
        let schema = property.as_object().unwrap_or_else(|| {
            tracing::warn!(key, "import: property is not a schema object, treating as text");
            &empty
        });
        let mut fragment = schema.clone();
        let label = match fragment.remove("title") {
            Some(Value::String(title)) => title,
            _ => key.to_string(),
        };
        let mut field = NestedField {
            id: ids.next_id(),
            field_type: FieldType::Control(ControlType::Text),
            key: Some(key.to_string()),
            label,
            required,
            schema: Map::new(),
            ui_options: UiOptions::default(),
            visibility: Vec::new(),
            effect: Effect::default(),
            children: None,
            parent_id: None,
        };

        let schema_type = schema.get("type").and_then(Value::as_str);
        let items = schema.get("items").and_then(Value::as_object);

        if let Some(options) = schema.get("enum").and_then(Value::as_array) {
            let control = if options.len() <= self.config.radio_max_options {
                ControlType::Radio
            } else {
                ControlType::Select
            };
            return self.leaf(field, control, fragment);
        }

        if schema_type == Some("array") && items.is_some_and(|i| i.contains_key("enum")) {
            let control = if self.config.is_checkbox_key(key) {
                ControlType::Multicheckbox
            } else {
                ControlType::Multiselect
            };
            return self.leaf(field, control, fragment);
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            // Objects wrap their children in a vertical layout so the editor
            // can drop into them.
            let layout_id = ids.next_id();
            let children = self.import_properties(properties, &required_keys(schema), ids);
            field.field_type = FieldType::Container(ContainerType::Object);
            field.children = Some(vec![layout(layout_id, children)]);
            return field;
        }

        if schema_type == Some("array") {
            field.field_type = FieldType::Container(ContainerType::Array);
            fragment.remove("type");
            let item_properties = items
                .and_then(|i| i.get("properties"))
                .and_then(Value::as_object);
            if let (Some(item_schema), Some(properties)) = (items, item_properties) {
                fragment.remove("items");
                let children =
                    self.import_properties(properties, &required_keys(item_schema), ids);
                field.children = Some(children);
            } else {
                field.children = Some(Vec::new());
            }
            field.schema = fragment;
            return field;
        }

        let control = self.primitive_control(key, schema, schema_type);
        self.leaf(field, control, fragment)
    }

    fn primitive_control(
        &self,
        key: &str,
        schema: &Map<String, Value>,
        schema_type: Option<&str>,
    ) -> ControlType {
        let format = schema.get("format").and_then(Value::as_str);
        match schema_type {
            Some("string")
                if schema
                    .get("maxLength")
                    .and_then(Value::as_u64)
                    .is_some_and(|max| max >= self.config.textarea_min_length) =>
            {
                ControlType::Textarea
            }
            Some(schema_type) => self
                .registry
                .match_primitive(schema_type, format)
                .or_else(|| self.registry.match_primitive(schema_type, None))
                .unwrap_or_else(|| {
                    tracing::warn!(
                        key,
                        schema_type,
                        ?format,
                        "import: no matching control, using text"
                    );
                    ControlType::Text
                }),
            None => {
                tracing::warn!(key, "import: property has no type, using text");
                ControlType::Text
            }
        }
    }

    fn leaf(
        &self,
        mut field: NestedField,
        control: ControlType,
        fragment: Map<String, Value>,
    ) -> NestedField {
        field.field_type = FieldType::Control(control);
        field.schema = fragment;
        field.ui_options = self
            .registry
            .get(control.into())
            .map(|def| def.default_ui_options.clone())
            .unwrap_or_default();
        field
    }
}

fn layout(id: FieldId, children: Vec<NestedField>) -> NestedField {
    NestedField {
        id,
        field_type: FieldType::Layout(LayoutType::Vertical),
        key: None,
        label: String::new(),
        required: false,
        schema: Map::new(),
        ui_options: UiOptions::default(),
        visibility: Vec::new(),
        effect: Effect::default(),
        children: Some(children),
        parent_id: None,
    }
}

fn required_keys(schema: &Map<String, Value>) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
