use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Compile a field tree into a form document (schema + UI schema).
    Build(BuildArgs),
    /// Convert a JSON Schema (or exported document) back into a field tree.
    Import(ImportArgs),
    /// Produce seed data for a field tree.
    Seed(SeedArgs),
    /// List node ids of a field tree in depth-first order.
    Ids(IdsArgs),
    /// Validate form data against the schema built from a field tree.
    Validate(ValidateArgs),
    /// Print the JSON Schema of a persisted document type.
    Schema(SchemaArgs),
}

/// Arguments for `fwk build`.
#[derive(Clone, Debug, Args)]
pub struct BuildArgs {
    /// Field tree file (nested JSON or form document), `-` for stdin.
    pub tree: PathBuf,
    /// Stamp the document with the export time.
    #[arg(long)]
    pub stamp: bool,
    /// Emit only the JSON Schema.
    #[arg(long, conflicts_with = "ui_only")]
    pub schema_only: bool,
    /// Emit only the UI Schema.
    #[arg(long)]
    pub ui_only: bool,
}

/// Arguments for `fwk import`.
#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// JSON Schema or form document file, `-` for stdin.
    pub schema: PathBuf,
    /// Emit a full form document instead of the bare tree.
    #[arg(long)]
    pub document: bool,
}

/// Arguments for `fwk seed`.
#[derive(Clone, Debug, Args)]
pub struct SeedArgs {
    /// Field tree file (nested JSON or form document), `-` for stdin.
    pub tree: PathBuf,
    /// Existing data to complete; present values are kept.
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// Arguments for `fwk ids`.
#[derive(Clone, Debug, Args)]
pub struct IdsArgs {
    /// Field tree file (nested JSON or form document), `-` for stdin.
    pub tree: PathBuf,
}

/// Arguments for `fwk validate`.
#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Field tree file (nested JSON or form document).
    pub tree: PathBuf,
    /// Form data file.
    pub data: PathBuf,
}

/// Arguments for `fwk schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; lists available names when omitted.
    pub name: Option<String>,
}
