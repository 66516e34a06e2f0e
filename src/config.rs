//! Project configuration stored in `docs-setup.toml`.
//!
//! This holds the static data the build hook and settings resolver consume:
//! project constants, the defaults used when the override file is silent,
//! and the redirect table. A missing file means built-in defaults.

use crate::error::{Result, SetupError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "docs-setup.toml";

/// Project constants and fallbacks for overridable metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project (site) name.
    pub name: String,
    pub copyright: String,
    pub publisher: String,
    /// Used when the override file has no `author`.
    pub default_author: String,
    /// Used when the override file has no `title`.
    pub default_title: String,
    /// The master toctree document.
    pub master_doc: String,
    /// Base name of the LaTeX, man and Texinfo outputs.
    pub target_name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "learn.adacore.com".to_string(),
            copyright: "2018 – 2021, AdaCore".to_string(),
            publisher: "AdaCore".to_string(),
            default_author: "AdaCore".to_string(),
            default_title: "Learn Ada (Complete)".to_string(),
            master_doc: "index".to_string(),
            target_name: "learnadacorecom".to_string(),
        }
    }
}

/// Complete configuration for a docs-setup project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub project: ProjectConfig,
    /// Retired document path -> replacement, relative to the retired page.
    pub redirects: BTreeMap<String, String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            redirects: default_redirects(),
        }
    }
}

pub fn default_redirects() -> BTreeMap<String, String> {
    [
        (
            "courses/Ada_For_The_C_Embedded_Developer/index",
            "../Ada_For_The_Embedded_C_Developer/",
        ),
        (
            "courses/GNAT_Toolchain_Getting_Started/index",
            "../GNAT_Toolchain_Intro/",
        ),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

impl Configuration {
    /// Load the configuration at `path`, or the defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Configuration> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Configuration::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| SetupError::io(path, e))?;
        toml::from_str(&contents).map_err(|source| SetupError::ProjectConfigMalformed {
            path: path.to_path_buf(),
            source,
        })
    }
}
