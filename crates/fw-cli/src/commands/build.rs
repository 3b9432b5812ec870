use fw_config::FormworkConfig;
use fw_schema::FormDocument;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BuildArgs;
use crate::commands::input::read_tree;
use crate::output::output;

/// Handle `fwk build`.
pub fn handle(
    args: &BuildArgs,
    config: &FormworkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    output(&execute(args, config)?, flags.format)
}

fn execute(args: &BuildArgs, config: &FormworkConfig) -> anyhow::Result<Value> {
    let tree = read_tree(&args.tree)?;
    let mut document = FormDocument::from_tree(tree, &config.ui);
    if args.schema_only {
        return Ok(document.schema);
    }
    if args.ui_only {
        return Ok(document.uischema);
    }
    if args.stamp {
        document = document.exported(chrono::Utc::now());
    }
    Ok(serde_json::to_value(document)?)
}
