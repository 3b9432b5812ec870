//! Field types, rule effects, condition operators, and joins for Formwork.
//!
//! All enums serialize to the exact strings used by the persisted tree and by
//! schema-driven renderers. Each provides `as_str()` and `Display`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ControlType
// ---------------------------------------------------------------------------

/// Leaf input controls offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Text,
    Textarea,
    Email,
    Url,
    Phone,
    Password,
    Number,
    Integer,
    Slider,
    Date,
    Time,
    Datetime,
    Checkbox,
    Toggle,
    Radio,
    Select,
    Multiselect,
    Multicheckbox,
    File,
}

impl ControlType {
    pub const ALL: [Self; 19] = [
        Self::Text,
        Self::Textarea,
        Self::Email,
        Self::Url,
        Self::Phone,
        Self::Password,
        Self::Number,
        Self::Integer,
        Self::Slider,
        Self::Date,
        Self::Time,
        Self::Datetime,
        Self::Checkbox,
        Self::Toggle,
        Self::Radio,
        Self::Select,
        Self::Multiselect,
        Self::Multicheckbox,
        Self::File,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Url => "url",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Slider => "slider",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Checkbox => "checkbox",
            Self::Toggle => "toggle",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Multicheckbox => "multicheckbox",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LayoutType
// ---------------------------------------------------------------------------

/// Non-addressable grouping containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum LayoutType {
    #[serde(rename = "vertical-layout")]
    Vertical,
    #[serde(rename = "horizontal-layout")]
    Horizontal,
    #[serde(rename = "group")]
    Group,
}

impl LayoutType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical-layout",
            Self::Horizontal => "horizontal-layout",
            Self::Group => "group",
        }
    }

    /// Element type emitted in the UI schema.
    #[must_use]
    pub const fn ui_element(self) -> &'static str {
        match self {
            Self::Vertical => "VerticalLayout",
            Self::Horizontal => "HorizontalLayout",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContainerType
// ---------------------------------------------------------------------------

/// Containers that introduce a schema property of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    Object,
    Array,
}

impl ContainerType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// The external `type` tag of a field node: the closed union of controls,
/// layouts, and containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldType {
    Control(ControlType),
    Layout(LayoutType),
    Container(ContainerType),
}

impl FieldType {
    pub const OBJECT: Self = Self::Container(ContainerType::Object);
    pub const ARRAY: Self = Self::Container(ContainerType::Array);

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Control(c) => c.as_str(),
            Self::Layout(l) => l.as_str(),
            Self::Container(c) => c.as_str(),
        }
    }

    #[must_use]
    pub const fn is_layout(self) -> bool {
        matches!(self, Self::Layout(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ControlType> for FieldType {
    fn from(value: ControlType) -> Self {
        Self::Control(value)
    }
}

impl From<LayoutType> for FieldType {
    fn from(value: LayoutType) -> Self {
        Self::Layout(value)
    }
}

impl From<ContainerType> for FieldType {
    fn from(value: ContainerType) -> Self {
        Self::Container(value)
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| format!("unknown field type: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// What a satisfied rule does to its UI element.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Effect {
    #[default]
    Show,
    Hide,
    Enable,
    Disable,
}

impl Effect {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "SHOW",
            Self::Hide => "HIDE",
            Self::Enable => "ENABLE",
            Self::Disable => "DISABLE",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Comparison applied by one condition row.
///
/// `Between` is not offered by the condition editor but stays supported so
/// previously exported documents keep compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Pattern,
    StartsWith,
    EndsWith,
    Between,
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Pattern => "pattern",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Between => "between",
        }
    }

    /// Whether the operator compares numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Neq | Self::Gt | Self::Gte | Self::Lt | Self::Lte | Self::Between
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LogicalJoin
// ---------------------------------------------------------------------------

/// How a condition row attaches to the row before it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum LogicalJoin {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl LogicalJoin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
