use fw_config::FormworkConfig;
use fw_core::{FieldTypeRegistry, SequentialIds};
use fw_schema::{FormDocument, SchemaImporter, import_document};
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::commands::input::read_json;
use crate::output::output;

/// Handle `fwk import`.
pub fn handle(
    args: &ImportArgs,
    config: &FormworkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    output(&execute(args, config)?, flags.format)
}

fn execute(args: &ImportArgs, config: &FormworkConfig) -> anyhow::Result<Value> {
    let value = read_json(&args.schema)?;
    let registry = FieldTypeRegistry::builtin();
    let importer = SchemaImporter::new(&registry, &config.import);
    let mut ids = SequentialIds::new(config.ids.prefix.clone());
    let tree = import_document(&value, &importer, &mut ids)?;
    tracing::debug!(nodes = tree.len(), "schema imported");

    if args.document {
        return Ok(serde_json::to_value(FormDocument::from_tree(tree, &config.ui))?);
    }
    Ok(serde_json::to_value(tree)?)
}
