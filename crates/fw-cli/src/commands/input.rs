//! Reading JSON inputs from files or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use fw_core::FieldTree;
use fw_schema::FormDocument;
use serde::Deserialize;
use serde_json::Value;

/// Read and parse a JSON file; `-` reads stdin.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Read a field tree from either a nested tree array or a form document.
pub fn read_tree(path: &Path) -> anyhow::Result<FieldTree> {
    let value = read_json(path)?;
    let tree = if fw_schema::is_form_document(&value) {
        FormDocument::deserialize(&value)
            .with_context(|| format!("{} is not a valid form document", path.display()))?
            .tree
    } else {
        FieldTree::deserialize(&value)
            .with_context(|| format!("{} is not a valid field tree", path.display()))?
    };
    tracing::debug!(path = %path.display(), nodes = tree.len(), "tree loaded");
    Ok(tree)
}
