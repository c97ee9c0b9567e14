use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GssError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GssConfig {
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub path: PathConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Options for [`crate::builder::create_graph_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Keep only the first occurrence of each node in the returned roots.
    ///
    /// Off by default: every root-qualifying entry contributes its node,
    /// so a key listed twice without a parent appears twice.
    #[serde(default)]
    pub dedup_roots: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
        }
    }
}

impl PathConfig {
    /// The configured separator, or `/` when it is empty.
    #[must_use]
    pub fn separator(&self) -> &str {
        if self.separator.is_empty() {
            "/"
        } else {
            &self.separator
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Spaces per depth level.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_separator() -> String {
    "/".to_string()
}

const fn default_indent() -> usize {
    2
}

/// Load a [`GssConfig`] from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Returns [`GssError::ConfigRead`] if the file exists but cannot be read,
/// or [`GssError::ConfigParse`] if it is not valid config TOML.
pub fn load_config(path: &Path) -> Result<GssConfig, GssError> {
    if !path.exists() {
        return Ok(GssConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| GssError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content).map_err(|source| GssError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a [`GssConfig`] from TOML text.
///
/// # Errors
///
/// Returns the TOML error if the text does not deserialize.
pub fn parse_config(content: &str) -> Result<GssConfig, toml::de::Error> {
    toml::from_str::<GssConfig>(content)
}
