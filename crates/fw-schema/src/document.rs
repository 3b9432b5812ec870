//! The persisted/exported form document: schema, UI schema, and the tree
//! they were generated from, serialized together.

use chrono::{DateTime, Utc};
use fw_config::UiConfig;
use fw_core::{FieldTree, IdGenerator, NestedField};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::build_schema;
use crate::error::SchemaError;
use crate::import::SchemaImporter;
use crate::ui::build_ui_schema;

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub version: u32,
    pub schema: Value,
    pub uischema: Value,
    #[schemars(with = "Vec<NestedField>")]
    pub tree: FieldTree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl FormDocument {
    /// Generate both schemas from `tree`.
    #[must_use]
    pub fn from_tree(tree: FieldTree, ui: &UiConfig) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            schema: build_schema(&tree),
            uischema: build_ui_schema(&tree, ui),
            tree,
            exported_at: None,
        }
    }

    #[must_use]
    pub fn exported(mut self, at: DateTime<Utc>) -> Self {
        self.exported_at = Some(at);
        self
    }
}

/// Whether `value` looks like a [`FormDocument`] rather than a bare schema.
#[must_use]
pub fn is_form_document(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("tree") && map.contains_key("schema"))
}

/// Re-import either a full document (its stored tree, full fidelity) or a
/// bare JSON Schema (heuristic import).
///
/// Ids of a stored tree are reserved in `ids` so later inserts never reuse
/// them.
///
/// # Errors
///
/// Returns `SchemaError::Parse` when a document's fields do not deserialize
/// (including tree validation failures), or any error of
/// [`SchemaImporter::import`] for bare schemas.
pub fn import_document(
    value: &Value,
    importer: &SchemaImporter<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<FieldTree, SchemaError> {
    if is_form_document(value) {
        let document = FormDocument::deserialize(value)?;
        if document.version > DOCUMENT_VERSION {
            tracing::warn!(
                version = document.version,
                supported = DOCUMENT_VERSION,
                "document is newer than this build, importing anyway"
            );
        }
        for id in document.tree.preorder() {
            ids.reserve(&id);
        }
        return Ok(document.tree);
    }
    importer.import(value, ids)
}
