use anyhow::Context;
use fw_schema::SchemaRegistry;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `fwk schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&execute(args)?, flags.format)
}

fn execute(args: &SchemaArgs) -> anyhow::Result<Value> {
    let registry = SchemaRegistry::new();
    match &args.name {
        None => Ok(serde_json::to_value(registry.list())?),
        Some(name) => registry.get(name).cloned().with_context(|| {
            format!(
                "unknown schema '{name}', expected one of: {}",
                registry.list().join(", ")
            )
        }),
    }
}
