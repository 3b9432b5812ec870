//! The field tree: an id-keyed arena of shared nodes.
//!
//! Nodes live behind `Arc` so cloning a tree is cheap and an edit only
//! reallocates the nodes it touches (`Arc::make_mut`). Every other node stays
//! pointer-identical between the old and the new tree.
//!
//! The persisted form is the nested [`NestedField`] list; loading it
//! recomputes all `parent_id` back-references from structure and rejects
//! duplicate ids, missing keys, and key collisions within a property level.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::enums::{ContainerType, Effect, FieldType};
use crate::errors::CoreError;
use crate::ids::FieldId;
use crate::node::{
    ArrayField, ConditionRow, FieldNode, LayoutField, LeafField, NodeKind, ObjectField, UiOptions,
    is_false,
};

/// Nested, self-contained representation of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NestedField {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub schema: Map<String, Value>,
    #[serde(default, skip_serializing_if = "UiOptions::is_empty")]
    pub ui_options: UiOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visibility: Vec<ConditionRow>,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NestedField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FieldId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree {
    nodes: BTreeMap<FieldId, Arc<FieldNode>>,
    roots: Vec<FieldId>,
}

impl FieldTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn roots(&self) -> &[FieldId] {
        &self.roots
    }

    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&FieldNode> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    #[must_use]
    pub fn contains(&self, id: &FieldId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Ordered child ids of `parent`, or the root list for `None`.
    /// Missing parents and leaves yield an empty slice.
    #[must_use]
    pub fn child_ids(&self, parent: Option<&FieldId>) -> &[FieldId] {
        match parent {
            None => &self.roots,
            Some(id) => self.get(id).map_or(&[][..], FieldNode::children),
        }
    }

    /// Resolve ids to nodes, skipping dangling ids.
    pub fn resolve<'a>(&'a self, ids: &'a [FieldId]) -> impl Iterator<Item = &'a FieldNode> + 'a {
        ids.iter().filter_map(|id| self.get(id))
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &FieldNode> + '_ {
        self.resolve(&self.roots)
    }

    pub fn children_of<'a>(&'a self, node: &'a FieldNode) -> impl Iterator<Item = &'a FieldNode> + 'a {
        self.resolve(node.children())
    }

    /// `id` followed by every descendant, in preorder, following child lists.
    #[must_use]
    pub fn subtree_ids(&self, id: &FieldId) -> Vec<FieldId> {
        let mut out = Vec::new();
        if self.contains(id) {
            self.collect_preorder(std::slice::from_ref(id), &mut out);
        }
        out
    }

    /// Every id reachable from the roots, in preorder.
    #[must_use]
    pub fn preorder(&self) -> Vec<FieldId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect_preorder(&self.roots, &mut out);
        out
    }

    fn collect_preorder(&self, ids: &[FieldId], out: &mut Vec<FieldId>) {
        for id in ids {
            if let Some(node) = self.get(id) {
                out.push(id.clone());
                self.collect_preorder(node.children(), out);
            }
        }
    }

    /// The object/array node whose `properties` the children of `parent`
    /// project into, walking up through layouts. `None` is the root level.
    #[must_use]
    pub fn property_owner(&self, parent: Option<&FieldId>) -> Option<FieldId> {
        let mut current = parent.cloned();
        while let Some(id) = current {
            let node = self.get(&id)?;
            if !node.is_layout() {
                return Some(id);
            }
            current = node.parent_id.clone();
        }
        None
    }

    /// Keys visible at the property level that `parent`'s children belong to,
    /// with layouts flattened.
    #[must_use]
    pub fn property_keys(&self, parent: Option<&FieldId>) -> Vec<String> {
        let owner = self.property_owner(parent);
        let mut keys = Vec::new();
        self.collect_level_keys(self.child_ids(owner.as_ref()), &mut keys);
        keys
    }

    fn collect_level_keys(&self, ids: &[FieldId], keys: &mut Vec<String>) {
        for node in self.resolve(ids) {
            match node.key() {
                Some(key) => keys.push(key.to_string()),
                None => self.collect_level_keys(node.children(), keys),
            }
        }
    }

    // --- mutation primitives (crate-internal; TreeOps is the public surface) ---

    pub(crate) fn node_mut(&mut self, id: &FieldId) -> Option<&mut FieldNode> {
        self.nodes.get_mut(id).map(Arc::make_mut)
    }

    pub(crate) fn child_list_mut(&mut self, parent: Option<&FieldId>) -> Option<&mut Vec<FieldId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => self.node_mut(id)?.children_mut(),
        }
    }

    /// Store a node without linking it into any child list.
    pub(crate) fn put(&mut self, node: FieldNode) {
        self.nodes.insert(node.id.clone(), Arc::new(node));
    }

    /// Drop a node entry without touching child lists.
    pub(crate) fn take(&mut self, id: &FieldId) -> Option<Arc<FieldNode>> {
        self.nodes.remove(id)
    }

    /// Shared handle to a node, for callers that want to compare identity.
    #[must_use]
    pub fn shared(&self, id: &FieldId) -> Option<&Arc<FieldNode>> {
        self.nodes.get(id)
    }

    // --- nested conversion ---

    /// Build a tree from its nested representation.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on duplicate ids, keyed nodes without a
    /// key, layouts with a key, leaves with children, or duplicate keys within
    /// a property level.
    pub fn from_nested(fields: Vec<NestedField>) -> Result<Self, CoreError> {
        let mut tree = Self::new();
        for field in fields {
            let id = tree.load(field, None)?;
            tree.roots.push(id);
        }
        tree.check_keys()?;
        Ok(tree)
    }

    fn load(&mut self, field: NestedField, parent: Option<&FieldId>) -> Result<FieldId, CoreError> {
        if self.contains(&field.id) {
            return Err(CoreError::Validation(format!("duplicate field id: {}", field.id)));
        }
        let id = field.id.clone();
        let key = || -> Result<String, CoreError> {
            field
                .key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| CoreError::Validation(format!("field {id} has no key")))
        };

        let kind = match field.field_type {
            FieldType::Control(control) => {
                if field.children.as_ref().is_some_and(|c| !c.is_empty()) {
                    return Err(CoreError::Validation(format!(
                        "leaf field {id} ({control}) cannot have children"
                    )));
                }
                NodeKind::Leaf(LeafField {
                    control,
                    key: key()?,
                    required: field.required,
                    schema: field.schema,
                })
            }
            FieldType::Layout(layout) => {
                if field.key.as_ref().is_some_and(|k| !k.is_empty()) {
                    return Err(CoreError::Validation(format!(
                        "layout field {id} ({layout}) cannot carry a key"
                    )));
                }
                NodeKind::Layout(LayoutField {
                    layout,
                    children: Vec::new(),
                })
            }
            FieldType::Container(ContainerType::Object) => NodeKind::Object(ObjectField {
                key: key()?,
                required: field.required,
                children: Vec::new(),
            }),
            FieldType::Container(ContainerType::Array) => NodeKind::Array(ArrayField {
                key: key()?,
                required: field.required,
                schema: field.schema,
                children: Vec::new(),
            }),
        };

        // Reserve the id before descending so a child reusing it is rejected.
        self.put(FieldNode {
            id: id.clone(),
            parent_id: parent.cloned(),
            label: field.label,
            ui_options: field.ui_options,
            visibility: field.visibility,
            effect: field.effect,
            kind,
        });
        let mut children = Vec::new();
        for child in field.children.unwrap_or_default() {
            children.push(self.load(child, Some(&id))?);
        }
        if let Some(list) = self.node_mut(&id).and_then(FieldNode::children_mut) {
            *list = children;
        }
        Ok(id)
    }

    fn check_keys(&self) -> Result<(), CoreError> {
        let mut owners: Vec<Option<FieldId>> = vec![None];
        owners.extend(
            self.nodes
                .values()
                .filter(|n| matches!(n.kind, NodeKind::Object(_) | NodeKind::Array(_)))
                .map(|n| Some(n.id.clone())),
        );
        for owner in owners {
            let mut keys = Vec::new();
            self.collect_level_keys(self.child_ids(owner.as_ref()), &mut keys);
            let mut seen = HashSet::new();
            for key in keys {
                if !seen.insert(key.clone()) {
                    let level = owner
                        .as_ref()
                        .map_or_else(|| "root".to_string(), ToString::to_string);
                    return Err(CoreError::Validation(format!(
                        "duplicate key '{key}' at property level {level}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Nested representation, children inline, `parent_id` filled in.
    #[must_use]
    pub fn to_nested(&self) -> Vec<NestedField> {
        self.root_nodes().map(|node| self.nest(node)).collect()
    }

    fn nest(&self, node: &FieldNode) -> NestedField {
        let children = node
            .is_container()
            .then(|| self.children_of(node).map(|child| self.nest(child)).collect());
        NestedField {
            id: node.id.clone(),
            field_type: node.field_type(),
            key: node.key().map(ToString::to_string),
            label: node.label.clone(),
            required: node.required(),
            schema: node.schema().cloned().unwrap_or_default(),
            ui_options: node.ui_options.clone(),
            visibility: node.visibility.clone(),
            effect: node.effect,
            children,
            parent_id: node.parent_id.clone(),
        }
    }
}

impl Serialize for FieldTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_nested().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<NestedField>::deserialize(deserializer)?;
        Self::from_nested(fields).map_err(serde::de::Error::custom)
    }
}
