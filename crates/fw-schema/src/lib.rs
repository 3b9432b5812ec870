//! # fw-schema
//!
//! Compiles a Formwork field tree to JSON Schema and UI Schema, and back.
//!
//! This crate provides:
//! - `build_schema`: tree → JSON Schema (layouts flattened, objects nested, arrays itemized)
//! - `build_ui_schema`: tree → UI Schema, with visibility rules from `compile_rule`
//! - `initialize_data`: seed data for a form, merged into existing data
//! - `SchemaImporter`: JSON Schema → tree (heuristic inverse of `build_schema`)
//! - `FormDocument`: the exported `(schema, uischema, tree)` bundle and its re-import
//! - `SchemaRegistry`: schemars-generated schemas of the persisted types, plus
//!   `validate_data` for checking form data against a built schema
//! - `FormEditor`: the state slot that serializes edits and owns derived schemas

pub mod builder;
pub mod data;
pub mod document;
pub mod editor;
pub mod error;
pub mod import;
pub mod registry;
pub mod rule;
pub mod ui;

pub use builder::build_schema;
pub use data::initialize_data;
pub use document::{DOCUMENT_VERSION, FormDocument, import_document, is_form_document};
pub use editor::{FormEditor, InsertOutcome};
pub use error::SchemaError;
pub use import::SchemaImporter;
pub use registry::{SchemaRegistry, validate_data};
pub use rule::{compile_predicate, compile_rule, escape_regex};
pub use ui::build_ui_schema;
