use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SeedArgs;
use crate::commands::input::{read_json, read_tree};
use crate::output::output;

/// Handle `fwk seed`.
pub fn handle(args: &SeedArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&execute(args)?, flags.format)
}

fn execute(args: &SeedArgs) -> anyhow::Result<Value> {
    let tree = read_tree(&args.tree)?;
    let existing = match &args.data {
        Some(path) => read_json(path)?,
        None => Value::Null,
    };
    Ok(fw_schema::initialize_data(&tree, &existing))
}
