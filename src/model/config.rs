use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from reach.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Base URL of the REST backend.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Ordered status labels; one column per label.
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    /// Whether dropping a card back into its own column moves it to the top.
    /// Default: no reposition and no network call.
    #[serde(default)]
    pub reposition_on_same_status: bool,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            api_base: default_api_base(),
            columns: default_columns(),
            reposition_on_same_status: false,
            ui: UiConfig::default(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:5000".to_string()
}

fn default_columns() -> Vec<String> {
    [
        "Not Contacted",
        "Contacted",
        "Responded",
        "Meeting Scheduled",
        "Closed",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides by theme slot name, as `#RRGGBB` hex strings.
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Show key hints in the status line.
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            show_key_hints: true,
        }
    }
}

fn default_true() -> bool {
    true
}
