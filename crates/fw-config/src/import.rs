//! Heuristics used when turning an external JSON Schema into a field tree.

use serde::{Deserialize, Serialize};

const fn default_radio_max_options() -> usize {
    3
}

fn default_checkbox_key_hints() -> Vec<String> {
    vec!["checkbox".to_string(), "check".to_string()]
}

const fn default_textarea_min_length() -> u64 {
    256
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Enums with at most this many options import as radio groups,
    /// larger ones as dropdowns.
    #[serde(default = "default_radio_max_options")]
    pub radio_max_options: usize,

    /// An array-of-enum property whose key contains one of these substrings
    /// imports as a checkbox group instead of a multi select.
    #[serde(default = "default_checkbox_key_hints")]
    pub checkbox_key_hints: Vec<String>,

    /// Strings whose `maxLength` reaches this value import as text areas.
    #[serde(default = "default_textarea_min_length")]
    pub textarea_min_length: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            radio_max_options: default_radio_max_options(),
            checkbox_key_hints: default_checkbox_key_hints(),
            textarea_min_length: default_textarea_min_length(),
        }
    }
}

impl ImportConfig {
    /// Whether `key` names a checkbox-style multi-value field.
    #[must_use]
    pub fn is_checkbox_key(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.checkbox_key_hints
            .iter()
            .any(|hint| !hint.is_empty() && key.contains(&hint.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ImportConfig::default();
        assert_eq!(config.radio_max_options, 3);
        assert_eq!(config.textarea_min_length, 256);
        assert!(config.is_checkbox_key("interests_checkbox"));
        assert!(config.is_checkbox_key("CheckedItems"));
        assert!(!config.is_checkbox_key("tags"));
    }
}
