//! Registry of JSON Schemas for Formwork's own persisted types.
//!
//! The `SchemaRegistry` builds JSON Schemas from fw-core/fw-schema types at
//! construction time using [`schemars::schema_for!`] and validates values via
//! `jsonschema`. [`validate_data`] applies the same validation to form data
//! against a schema produced by [`crate::build_schema`].

use std::collections::HashMap;

use schemars::schema_for;
use serde_json::Value;

use crate::error::SchemaError;

/// Named JSON Schemas of the persisted document shapes.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap_or_default());
    };
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        register!(schemas, "form_document", crate::document::FormDocument);
        register!(schemas, "field_tree", Vec<fw_core::NestedField>);
        register!(schemas, "nested_field", fw_core::NestedField);
        register!(schemas, "condition_row", fw_core::ConditionRow);
        register!(schemas, "ui_options", fw_core::UiOptions);
        register!(schemas, "drop_zone", fw_core::DropZone);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        validate_against(schema, instance)
    }

    /// List all registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate form data against a built form schema.
///
/// # Errors
///
/// Returns `SchemaError::Generation` if the schema does not compile, or
/// `SchemaError::ValidationFailed` listing every violation.
pub fn validate_data(schema: &Value, data: &Value) -> Result<(), SchemaError> {
    validate_against(schema, data)
}

fn validate_against(schema: &Value, instance: &Value) -> Result<(), SchemaError> {
    // `format` is rendering and import metadata here, never an assertion.
    let validator = jsonschema::options()
        .should_validate_formats(false)
        .build(schema)
        .map_err(|e| SchemaError::Generation(format!("{e}")))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::ValidationFailed { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_config::UiConfig;
    use fw_core::FieldTree;
    use serde_json::json;

    use crate::document::FormDocument;
    use crate::{build_schema, initialize_data};

    fn tree() -> FieldTree {
        serde_json::from_value(json!([
            {"id": "a", "type": "text", "key": "name", "label": "Name", "required": true,
             "schema": {"type": "string"}},
            {"id": "b", "type": "integer", "key": "age", "label": "Age",
             "schema": {"type": "integer", "minimum": 0}}
        ]))
        .unwrap()
    }

    #[test]
    fn registry_lists_sorted_names() {
        let reg = SchemaRegistry::new();
        assert_eq!(reg.schema_count(), 6);
        let names = reg.list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(reg.get("form_document").is_some());
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn exported_document_validates() {
        let reg = SchemaRegistry::new();
        let doc = FormDocument::from_tree(tree(), &UiConfig::default())
            .exported(chrono::Utc::now());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(reg.validate("form_document", &value).is_ok());
    }

    #[test]
    fn document_without_tree_is_rejected() {
        let reg = SchemaRegistry::new();
        let result = reg.validate(
            "form_document",
            &json!({"version": 1, "schema": {}, "uischema": {}}),
        );
        assert!(matches!(
            result,
            Err(SchemaError::ValidationFailed { errors }) if !errors.is_empty()
        ));
    }

    #[test]
    fn unknown_schema_name_is_not_found() {
        let reg = SchemaRegistry::new();
        assert!(matches!(
            reg.validate("bogus", &json!({})),
            Err(SchemaError::NotFound(_))
        ));
    }

    #[test]
    fn seeded_data_satisfies_built_schema() {
        let t = tree();
        let schema = build_schema(&t);
        let data = initialize_data(&t, &Value::Null);
        assert!(validate_data(&schema, &data).is_ok());
    }

    #[test]
    fn data_violations_are_listed() {
        let schema = build_schema(&tree());
        let result = validate_data(&schema, &json!({"age": -3}));
        let Err(SchemaError::ValidationFailed { errors }) = result else {
            panic!("expected ValidationFailed");
        };
        assert_eq!(errors.len(), 2);
    }
}
