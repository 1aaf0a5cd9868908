//! Resolver configuration.

use serde::{Deserialize, Serialize};

use crate::harvest::{DEFAULT_CONTAINER_ROWS, DEFAULT_HARVEST_ROWS};
use crate::hints::HintRuleConfig;

/// Resolver options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Master switch. When off, no badge is placed and no lookup is made.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Log every cascade step.
    #[serde(default)]
    pub debug: bool,
    /// Works requested by the bibliographic query.
    #[serde(default = "default_harvest_rows")]
    pub max_harvest_rows: u32,
    /// Works requested per container-title query.
    #[serde(default = "default_container_rows")]
    pub container_rows: u32,
    /// Hint rules merged ahead of the built-in ones.
    #[serde(default)]
    pub custom_hints: Vec<HintRuleConfig>,
}

fn default_enabled() -> bool {
    true
}

fn default_harvest_rows() -> u32 {
    DEFAULT_HARVEST_ROWS
}

fn default_container_rows() -> u32 {
    DEFAULT_CONTAINER_ROWS
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            debug: false,
            max_harvest_rows: default_harvest_rows(),
            container_rows: default_container_rows(),
            custom_hints: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RankOptions::default();
        assert!(options.enabled);
        assert!(!options.debug);
        assert_eq!(options.max_harvest_rows, 8);
        assert_eq!(options.container_rows, 3);
        assert!(options.custom_hints.is_empty());
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: RankOptions = toml::from_str(
            r#"
debug = true

[[custom_hints]]
pattern = "/Nordic Workshop/i"
issn = "1234-5678"
"#,
        )
        .unwrap();
        assert!(options.enabled);
        assert!(options.debug);
        assert_eq!(options.custom_hints.len(), 1);
        assert_eq!(options.custom_hints[0].name, None);
    }
}
