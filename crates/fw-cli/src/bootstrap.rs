use anyhow::Context;
use fw_config::FormworkConfig;

/// Load layered configuration, picking up a workspace `.env` first.
pub fn load_config() -> anyhow::Result<FormworkConfig> {
    let config = FormworkConfig::load_with_dotenv().context("failed to load formwork config")?;
    tracing::debug!(
        radio_max_options = config.import.radio_max_options,
        id_prefix = %config.ids.prefix,
        "config loaded"
    );
    Ok(config)
}
