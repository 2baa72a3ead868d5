//! TOML policy configuration.
//!
//! Holds the tables behind the default category and authority
//! collaborators. The crate is fully usable without a config file:
//! [`PolicyConfig::default()`] carries a small built-in rule set, and a
//! TOML file replaces whichever tables it declares.
//!
//! ```toml
//! [authority.boost]
//! flickr = 80.0
//!
//! [authority.penalty]
//! lowquality = 40.0
//!
//! [categories.by_source]
//! sciencemuseum = ["digitized_artwork"]
//!
//! [categories.by_extension]
//! svg = "illustration"
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub authority: AuthorityConfig,
    #[serde(default)]
    pub categories: CategoryConfig,
}

/// Per-source authority score tables. Values must lie within `[0, 100]`.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthorityConfig {
    #[serde(default = "default_boost_table")]
    pub boost: HashMap<String, f64>,
    #[serde(default = "default_penalty_table")]
    pub penalty: HashMap<String, f64>,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            boost: default_boost_table(),
            penalty: default_penalty_table(),
        }
    }
}

fn default_boost_table() -> HashMap<String, f64> {
    HashMap::from([
        ("flickr".to_string(), 80.0),
        ("wikimedia".to_string(), 70.0),
        ("behance".to_string(), 65.0),
    ])
}

fn default_penalty_table() -> HashMap<String, f64> {
    HashMap::from([("clipart".to_string(), 50.0)])
}

/// Category rules: categories attached to every work from a source, plus
/// a single category implied by a file extension.
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    #[serde(default = "default_source_categories")]
    pub by_source: HashMap<String, Vec<String>>,
    #[serde(default = "default_extension_categories")]
    pub by_extension: HashMap<String, String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            by_source: default_source_categories(),
            by_extension: default_extension_categories(),
        }
    }
}

fn default_source_categories() -> HashMap<String, Vec<String>> {
    HashMap::from([
        (
            "sciencemuseum".to_string(),
            vec!["digitized_artwork".to_string()],
        ),
        (
            "museumsvictoria".to_string(),
            vec!["digitized_artwork".to_string()],
        ),
        (
            "animaldiversity".to_string(),
            vec!["photograph".to_string()],
        ),
        ("floraon".to_string(), vec!["photograph".to_string()]),
    ])
}

fn default_extension_categories() -> HashMap<String, String> {
    HashMap::from([("svg".to_string(), "illustration".to_string())])
}

/// Load and validate a policy config from a TOML file.
pub fn load_config(path: &Path) -> Result<PolicyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: PolicyConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    debug!(path = %path.display(), "loaded policy config");
    Ok(config)
}

/// Validate a policy config, whether loaded from file or built in code.
pub fn validate(config: &PolicyConfig) -> Result<()> {
    for (table, entries) in [
        ("authority.boost", &config.authority.boost),
        ("authority.penalty", &config.authority.penalty),
    ] {
        for (source, score) in entries {
            if !(0.0..=100.0).contains(score) {
                anyhow::bail!(
                    "{}.{} must be within [0, 100], got {}",
                    table,
                    source,
                    score
                );
            }
        }
    }

    for (source, categories) in &config.categories.by_source {
        if categories.is_empty() {
            anyhow::bail!("categories.by_source.{} must not be an empty list", source);
        }
    }

    Ok(())
}
