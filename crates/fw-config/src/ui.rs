//! UI schema generation settings.

use serde::{Deserialize, Serialize};

fn default_confirm_suffix() -> String {
    "_confirm".to_string()
}

fn default_confirm_label_prefix() -> String {
    "Confirm ".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiConfig {
    /// Appended to a password key to form its confirmation control's key.
    #[serde(default = "default_confirm_suffix")]
    pub confirm_suffix: String,

    #[serde(default = "default_confirm_label_prefix")]
    pub confirm_label_prefix: String,

    /// Icon for group layouts that do not set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_group_icon: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_suffix: default_confirm_suffix(),
            confirm_label_prefix: default_confirm_label_prefix(),
            default_group_icon: None,
        }
    }
}
