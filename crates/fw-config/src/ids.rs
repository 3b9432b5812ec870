//! Field id generation settings.

use serde::{Deserialize, Serialize};

fn default_prefix() -> String {
    "field".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdsConfig {
    /// Minted ids look like `<prefix>-<n>`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}
