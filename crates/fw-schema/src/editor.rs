//! Editor state slot.
//!
//! `FormEditor` owns the current tree and the schemas derived from it. Every
//! edit goes through `&mut self`, so edits are serialized by construction.
//! Tree operations stay silent no-ops on invalid input; boundary actions
//! (applying edited schema text) report failures and keep the previous state.

use std::collections::HashSet;

use fw_config::FormworkConfig;
use fw_core::enums::FieldType;
use fw_core::ops::{self, DropZone};
use fw_core::{
    CoreError, FieldId, FieldNode, FieldTree, FieldTypeRegistry, IdGenerator, OperationToken,
    SequentialIds,
};
use serde_json::Value;

use crate::builder::build_schema;
use crate::data::initialize_data;
use crate::document::{DOCUMENT_VERSION, FormDocument, import_document};
use crate::error::SchemaError;
use crate::import::SchemaImporter;
use crate::ui::build_ui_schema;

/// Result of a palette drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(FieldId),
    /// The token was already applied; the tree is unchanged.
    DuplicateToken,
    /// The target does not accept drops; the tree is unchanged.
    InvalidTarget,
}

pub struct FormEditor {
    tree: FieldTree,
    schema: Value,
    uischema: Value,
    registry: FieldTypeRegistry,
    config: FormworkConfig,
    ids: SequentialIds,
    applied: HashSet<OperationToken>,
}

impl FormEditor {
    #[must_use]
    pub fn new(config: FormworkConfig) -> Self {
        Self::with_tree(FieldTree::new(), config)
    }

    /// Start from an existing tree; its ids are reserved.
    #[must_use]
    pub fn with_tree(tree: FieldTree, config: FormworkConfig) -> Self {
        let mut ids = SequentialIds::new(config.ids.prefix.clone());
        for id in tree.preorder() {
            ids.reserve(&id);
        }
        let mut editor = Self {
            schema: Value::Null,
            uischema: Value::Null,
            tree: FieldTree::new(),
            registry: FieldTypeRegistry::builtin(),
            config,
            ids,
            applied: HashSet::new(),
        };
        editor.replace_tree(tree);
        editor
    }

    #[must_use]
    pub fn with_registry(mut self, registry: FieldTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub const fn tree(&self) -> &FieldTree {
        &self.tree
    }

    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    #[must_use]
    pub const fn uischema(&self) -> &Value {
        &self.uischema
    }

    #[must_use]
    pub const fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }

    /// Current state as an exportable document.
    #[must_use]
    pub fn document(&self) -> FormDocument {
        FormDocument {
            version: DOCUMENT_VERSION,
            schema: self.schema.clone(),
            uischema: self.uischema.clone(),
            tree: self.tree.clone(),
            exported_at: None,
        }
    }

    /// Defaults for every property, merged into `existing`.
    #[must_use]
    pub fn seed_data(&self, existing: &Value) -> Value {
        initialize_data(&self.tree, existing)
    }

    /// Materialize a palette entry under `parent` at `index`.
    ///
    /// A token is applied at most once: a repeated token is rejected without
    /// touching the tree. Tokens of rejected drops are not recorded.
    pub fn insert(
        &mut self,
        token: OperationToken,
        field_type: FieldType,
        parent: Option<&FieldId>,
        index: usize,
    ) -> InsertOutcome {
        if self.applied.contains(&token) {
            tracing::debug!(%token, "insert: duplicate operation token");
            return InsertOutcome::DuplicateToken;
        }
        let (tree, inserted) = ops::insert_field(
            &self.tree,
            &self.registry,
            field_type,
            parent,
            index,
            &mut self.ids,
        );
        match inserted {
            Some(id) => {
                self.applied.insert(token);
                self.replace_tree(tree);
                InsertOutcome::Inserted(id)
            }
            None => InsertOutcome::InvalidTarget,
        }
    }

    pub fn update(&mut self, node: FieldNode) {
        let tree = ops::update_by_id(&self.tree, node);
        self.replace_tree(tree);
    }

    pub fn delete(&mut self, id: &FieldId) {
        let tree = ops::delete_by_id(&self.tree, id);
        self.replace_tree(tree);
    }

    pub fn move_field(&mut self, id: &FieldId, parent: Option<&FieldId>, index: usize) {
        let tree = ops::move_field(&self.tree, id, parent, index);
        self.replace_tree(tree);
    }

    /// Apply a drag ending over `over_id`.
    pub fn reorder(
        &mut self,
        active_id: &FieldId,
        over_id: &FieldId,
        over_data: Option<&DropZone>,
    ) {
        let tree = ops::reorder_relative(&self.tree, active_id, over_id, over_data);
        self.replace_tree(tree);
    }

    /// Copy a subtree next to the original.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Core(CoreError::NotFound)` for an unknown id.
    pub fn duplicate(&mut self, id: &FieldId) -> Result<FieldId, SchemaError> {
        let (tree, copy) = ops::duplicate_field(&self.tree, id, &mut self.ids);
        let copy = copy.ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;
        self.replace_tree(tree);
        Ok(copy)
    }

    /// Replace the form from edited JSON Schema (or full document) text.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` for invalid JSON and any import error for
    /// an unusable schema. The previous tree and schemas stay in effect.
    pub fn apply_schema_text(&mut self, text: &str) -> Result<(), SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        let importer = SchemaImporter::new(&self.registry, &self.config.import);
        // Import into a scratch generator so a failed import burns no ids.
        let mut ids = self.ids.clone();
        let tree = import_document(&value, &importer, &mut ids)?;
        self.ids = ids;
        self.replace_tree(tree);
        Ok(())
    }

    /// Replace the UI schema with edited text. The override lasts until the
    /// next tree edit regenerates it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` for invalid JSON and
    /// `SchemaError::InvalidSchema` when the root is not a UI schema element.
    /// The previous UI schema stays in effect.
    pub fn apply_ui_schema_text(&mut self, text: &str) -> Result<(), SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.get("type").is_some_and(Value::is_string) {
            return Err(SchemaError::InvalidSchema(
                "UI schema root must be an object with a string 'type'".into(),
            ));
        }
        self.uischema = value;
        Ok(())
    }

    fn replace_tree(&mut self, tree: FieldTree) {
        if tree == self.tree && !self.schema.is_null() {
            return;
        }
        self.schema = build_schema(&tree);
        self.uischema = build_ui_schema(&tree, &self.config.ui);
        self.tree = tree;
    }
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new(FormworkConfig::default())
    }
}
