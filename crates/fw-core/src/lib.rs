//! # fw-core
//!
//! Field-tree model, ids, field-type registry, and tree operations for Formwork.
//!
//! This crate provides the foundational types shared across all Formwork crates:
//! - `FieldNode` and its tagged `NodeKind` (leaf, layout, object, array)
//! - `FieldTree`, an id-keyed arena with structural sharing between edits
//! - Field type, effect, operator, and join enums
//! - Id generation behind the `IdGenerator` trait
//! - The built-in field-type registry (palette defaults)
//! - Tree operations: find, update, insert, delete, move, reorder, id enumeration
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod ids;
pub mod node;
pub mod ops;
pub mod registry;
pub mod tree;

pub use errors::CoreError;
pub use ops::DropZone;
pub use ids::{FieldId, IdGenerator, OperationToken, SequentialIds};
pub use node::{
    ArrayField, ConditionRow, FieldNode, LayoutField, LeafField, NodeKind, ObjectField, UiOptions,
};
pub use registry::{FieldTypeDef, FieldTypeRegistry};
pub use tree::{FieldTree, NestedField};
