use fw_schema::SchemaError;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::commands::input::{read_json, read_tree};
use crate::output::output;

#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// Handle `fwk validate`. Prints the report, then fails when data is invalid.
/// With `--quiet` only the exit status tells the outcome.
pub fn handle(args: &ValidateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = execute(args)?;
    if !flags.quiet {
        output(&report, flags.format)?;
    }
    if !report.valid {
        anyhow::bail!(
            "data does not match the form schema ({} errors)",
            report.errors.len()
        );
    }
    Ok(())
}

fn execute(args: &ValidateArgs) -> anyhow::Result<ValidationReport> {
    let tree = read_tree(&args.tree)?;
    let data = read_json(&args.data)?;
    let schema = fw_schema::build_schema(&tree);
    match fw_schema::validate_data(&schema, &data) {
        Ok(()) => Ok(ValidationReport {
            valid: true,
            errors: Vec::new(),
        }),
        Err(SchemaError::ValidationFailed { errors }) => Ok(ValidationReport {
            valid: false,
            errors,
        }),
        Err(error) => Err(error.into()),
    }
}
