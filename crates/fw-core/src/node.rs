//! Field node model.
//!
//! A node carries the fields every kind shares (id, label, presentation
//! options, visibility rows) plus a tagged [`NodeKind`] holding only what its
//! shape needs. Child lists hold ids into the owning [`crate::FieldTree`];
//! `parent_id` is lookup metadata recomputed by the tree, never an ownership
//! edge.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::{
    ContainerType, ControlType, Effect, FieldType, LayoutType, LogicalJoin, Operator,
};
use crate::ids::FieldId;

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) const fn is_false(value: &bool) -> bool {
    !*value
}

/// Presentation directives attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UiOptions {
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,

    /// Multi-line text or multi-value select.
    #[serde(default, skip_serializing_if = "is_false")]
    pub multi: bool,

    /// Display style hint (`radio`, `checkbox`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub toggle: bool,

    /// Password fields only: render a second confirmation input.
    #[serde(default, skip_serializing_if = "is_false")]
    pub confirm: bool,

    /// Group layouts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Renderer-specific options passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UiOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Options as emitted on a UI schema element. `confirm` and `icon` are
    /// consumed by the UI schema builder itself and are not forwarded.
    #[must_use]
    pub fn element_options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        if self.readonly {
            options.insert("readonly".into(), Value::Bool(true));
        }
        if self.multi {
            options.insert("multi".into(), Value::Bool(true));
        }
        if let Some(format) = &self.format {
            options.insert("format".into(), Value::String(format.clone()));
        }
        if self.toggle {
            options.insert("toggle".into(), Value::Bool(true));
        }
        for (k, v) in &self.extra {
            options.insert(k.clone(), v.clone());
        }
        options
    }
}

/// One user-authored visibility condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRow {
    #[serde(alias = "dependsOn")]
    pub depends_on_key: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub logical_join: LogicalJoin,
}

impl ConditionRow {
    #[must_use]
    pub fn new(depends_on_key: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            depends_on_key: depends_on_key.into(),
            operator,
            value,
            logical_join: LogicalJoin::None,
        }
    }

    #[must_use]
    pub fn joined(mut self, join: LogicalJoin) -> Self {
        self.logical_join = join;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafField {
    pub control: ControlType,
    pub key: String,
    pub required: bool,
    pub schema: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    pub layout: LayoutType,
    pub children: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectField {
    pub key: String,
    pub required: bool,
    pub children: Vec<FieldId>,
}

/// Array container; `children` describe the item shape once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayField {
    pub key: String,
    pub required: bool,
    pub schema: Map<String, Value>,
    pub children: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(LeafField),
    Layout(LayoutField),
    Object(ObjectField),
    Array(ArrayField),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub id: FieldId,
    pub parent_id: Option<FieldId>,
    pub label: String,
    pub ui_options: UiOptions,
    pub visibility: Vec<ConditionRow>,
    pub effect: Effect,
    pub kind: NodeKind,
}

impl FieldNode {
    /// A node with default presentation and no rules.
    #[must_use]
    pub fn new(id: FieldId, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            parent_id: None,
            label: label.into(),
            ui_options: UiOptions::default(),
            visibility: Vec::new(),
            effect: Effect::default(),
            kind,
        }
    }

    #[must_use]
    pub fn leaf(
        id: FieldId,
        control: ControlType,
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            label,
            NodeKind::Leaf(LeafField {
                control,
                key: key.into(),
                required: false,
                schema: Map::new(),
            }),
        )
    }

    #[must_use]
    pub fn layout(id: FieldId, layout: LayoutType, label: impl Into<String>) -> Self {
        Self::new(
            id,
            label,
            NodeKind::Layout(LayoutField {
                layout,
                children: Vec::new(),
            }),
        )
    }

    #[must_use]
    pub fn object(id: FieldId, key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            id,
            label,
            NodeKind::Object(ObjectField {
                key: key.into(),
                required: false,
                children: Vec::new(),
            }),
        )
    }

    #[must_use]
    pub fn array(id: FieldId, key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            id,
            label,
            NodeKind::Array(ArrayField {
                key: key.into(),
                required: false,
                schema: Map::new(),
                children: Vec::new(),
            }),
        )
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        if let Value::Object(map) = schema {
            match &mut self.kind {
                NodeKind::Leaf(leaf) => leaf.schema = map,
                NodeKind::Array(array) => array.schema = map,
                NodeKind::Layout(_) | NodeKind::Object(_) => {}
            }
        }
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        match &mut self.kind {
            NodeKind::Leaf(LeafField { required: r, .. })
            | NodeKind::Object(ObjectField { required: r, .. })
            | NodeKind::Array(ArrayField { required: r, .. }) => *r = required,
            NodeKind::Layout(_) => {}
        }
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, rows: Vec<ConditionRow>, effect: Effect) -> Self {
        self.visibility = rows;
        self.effect = effect;
        self
    }

    #[must_use]
    pub fn with_ui_options(mut self, ui_options: UiOptions) -> Self {
        self.ui_options = ui_options;
        self
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match &self.kind {
            NodeKind::Leaf(leaf) => FieldType::Control(leaf.control),
            NodeKind::Layout(layout) => FieldType::Layout(layout.layout),
            NodeKind::Object(_) => FieldType::Container(ContainerType::Object),
            NodeKind::Array(_) => FieldType::Container(ContainerType::Array),
        }
    }

    /// Property name, `None` for layouts.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(LeafField { key, .. })
            | NodeKind::Object(ObjectField { key, .. })
            | NodeKind::Array(ArrayField { key, .. }) => Some(key),
            NodeKind::Layout(_) => None,
        }
    }

    pub(crate) fn set_key(&mut self, new_key: String) {
        match &mut self.kind {
            NodeKind::Leaf(LeafField { key, .. })
            | NodeKind::Object(ObjectField { key, .. })
            | NodeKind::Array(ArrayField { key, .. }) => *key = new_key,
            NodeKind::Layout(_) => {}
        }
    }

    #[must_use]
    pub const fn required(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(LeafField { required, .. })
            | NodeKind::Object(ObjectField { required, .. })
            | NodeKind::Array(ArrayField { required, .. }) => *required,
            NodeKind::Layout(_) => false,
        }
    }

    /// Schema fragment for leaves and arrays.
    #[must_use]
    pub const fn schema(&self) -> Option<&Map<String, Value>> {
        match &self.kind {
            NodeKind::Leaf(LeafField { schema, .. }) | NodeKind::Array(ArrayField { schema, .. }) => {
                Some(schema)
            }
            NodeKind::Layout(_) | NodeKind::Object(_) => None,
        }
    }

    /// Ordered child ids; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[FieldId] {
        match &self.kind {
            NodeKind::Layout(LayoutField { children, .. })
            | NodeKind::Object(ObjectField { children, .. })
            | NodeKind::Array(ArrayField { children, .. }) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<FieldId>> {
        match &mut self.kind {
            NodeKind::Layout(LayoutField { children, .. })
            | NodeKind::Object(ObjectField { children, .. })
            | NodeKind::Array(ArrayField { children, .. }) => Some(children),
            NodeKind::Leaf(_) => None,
        }
    }

    #[must_use]
    pub const fn is_layout(&self) -> bool {
        matches!(self.kind, NodeKind::Layout(_))
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        !matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Drops (moves and palette inserts) land only in layouts and arrays.
    #[must_use]
    pub const fn accepts_drop(&self) -> bool {
        matches!(self.kind, NodeKind::Layout(_) | NodeKind::Array(_))
    }
}
