use fw_config::FormworkConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod build;
pub mod ids;
pub mod import;
pub mod input;
pub mod schema;
pub mod seed;
pub mod validate;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: &Commands,
    config: &FormworkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Build(args) => build::handle(args, config, flags),
        Commands::Import(args) => import::handle(args, config, flags),
        Commands::Seed(args) => seed::handle(args, flags),
        Commands::Ids(args) => ids::handle(args, flags),
        Commands::Validate(args) => validate::handle(args, flags),
        Commands::Schema(args) => schema::handle(args, flags),
    }
}
