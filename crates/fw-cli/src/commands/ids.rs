use fw_core::FieldId;
use fw_core::ops::get_all_ids;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IdsArgs;
use crate::commands::input::read_tree;
use crate::output::output;

/// Handle `fwk ids`.
pub fn handle(args: &IdsArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&execute(args)?, flags.format)
}

fn execute(args: &IdsArgs) -> anyhow::Result<Vec<FieldId>> {
    Ok(get_all_ids(&read_tree(&args.tree)?))
}
