//! # fw-config
//!
//! Layered configuration loading for Formwork using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FORMWORK_*` prefix, `__` as separator)
//! 2. Project-level `.formwork/config.toml`
//! 3. User-level `~/.config/formwork/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FORMWORK_IMPORT__RADIO_MAX_OPTIONS` -> `import.radio_max_options`,
//! `FORMWORK_IDS__PREFIX` -> `ids.prefix`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use fw_config::FormworkConfig;
//!
//! let config = FormworkConfig::load_with_dotenv().expect("config");
//! println!("radio groups up to {} options", config.import.radio_max_options);
//! ```

mod error;
mod ids;
mod import;
mod ui;

pub use error::ConfigError;
pub use ids::IdsConfig;
pub use import::ImportConfig;
pub use ui::UiConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormworkConfig {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub ids: IdsConfig,
}

impl FormworkConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse and
    /// `ConfigError::InvalidValue` when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".formwork/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FORMWORK_").split("__"))
    }

    /// Reject values no generator or importer can work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.import.radio_max_options == 0 {
            return Err(ConfigError::invalid(
                "import.radio_max_options",
                "must be at least 1",
            ));
        }
        if self.ui.confirm_suffix.is_empty() {
            return Err(ConfigError::invalid(
                "ui.confirm_suffix",
                "must not be empty, the confirmation key would shadow the password key",
            ));
        }
        if self.ids.prefix.trim().is_empty() {
            return Err(ConfigError::invalid("ids.prefix", "must not be empty"));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("formwork").join("config.toml"))
    }

    /// Load `.env` from the workspace root, walking up from
    /// `CARGO_MANIFEST_DIR` when set, else from the current directory.
    /// Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FormworkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ids.prefix, "field");
    }

    #[test]
    fn zero_radio_options_rejected() {
        let mut config = FormworkConfig::default();
        config.import.radio_max_options = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("import.radio_max_options"));
    }

    #[test]
    fn blank_prefix_rejected() {
        let mut config = FormworkConfig::default();
        config.ids.prefix = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "ids.prefix"
        ));
    }
}
