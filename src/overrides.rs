//! Per-build overrides read from an INI file.
//!
//! The file is flat `key = value` pairs. Keys appearing before any section
//! header and keys under `[DEFAULT]` make up the default section, which is
//! the only one consulted. Keys are case-insensitive; values are kept
//! verbatim (no quote or escape processing) apart from trimming, so LaTeX
//! snippets such as `\\and` survive untouched.

use crate::error::{Result, SetupError};
use crate::paths::{resolve_relative_path, ResolvedPath};
use indexmap::IndexMap;
use ini::{Ini, ParseOption};
use std::path::{Path, PathBuf};

pub const AUTHOR: &str = "author";
pub const TITLE: &str = "title";
pub const VERSION: &str = "version";
pub const COVER_PAGE: &str = "cover_page";
pub const LATEX_TOPLEVEL_SECTIONING: &str = "latex_toplevel_sectioning";
pub const EPUB_TOCDEPTH: &str = "epub_tocdepth";

const DEFAULT_SECTION: &str = "DEFAULT";

/// Values from the override file, or nothing at all if none was configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOverrides {
    source: Option<PathBuf>,
    values: IndexMap<String, String>,
}

/// Load overrides from `path`.
///
/// `None` or an empty path yields empty overrides, meaning "use defaults".
/// A path that does not point at a regular file is fatal.
pub fn load_overrides(path: Option<&Path>) -> Result<BuildOverrides> {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(BuildOverrides::default()),
    };

    if !path.is_file() {
        return Err(SetupError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| SetupError::io(path, e))?;
    let mut overrides = BuildOverrides::parse(&contents).map_err(|message| {
        SetupError::OverridesMalformed {
            path: path.to_path_buf(),
            message,
        }
    })?;
    overrides.source = Some(path.to_path_buf());

    log::debug!(
        "Loaded {} override(s) from {}",
        overrides.values.len(),
        path.display()
    );
    Ok(overrides)
}

/// Indented continuation lines join the value with a newline, minus
/// their indentation.
fn normalize_value(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

impl BuildOverrides {
    fn parse(contents: &str) -> std::result::Result<BuildOverrides, String> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            enabled_indented_mutiline_value: true,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(contents, options).map_err(|e| e.to_string())?;

        let mut values = IndexMap::new();
        for (section, properties) in ini.iter() {
            match section {
                None => {}
                Some(name) if name.eq_ignore_ascii_case(DEFAULT_SECTION) => {}
                Some(name) => {
                    log::debug!("Ignoring override section [{name}]");
                    continue;
                }
            }
            for (key, value) in properties.iter() {
                values.insert(key.trim().to_ascii_lowercase(), normalize_value(value));
            }
        }

        Ok(BuildOverrides {
            source: None,
            values,
        })
    }

    /// Directory that relative paths inside the override file are
    /// resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw lookup of any key in the default section.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get(AUTHOR)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(TITLE)
    }

    pub fn version(&self) -> Option<&str> {
        self.get(VERSION)
    }

    pub fn cover_page(&self) -> Option<&str> {
        self.get(COVER_PAGE)
    }

    pub fn latex_toplevel_sectioning(&self) -> Option<&str> {
        self.get(LATEX_TOPLEVEL_SECTIONING)
    }

    pub fn epub_tocdepth(&self) -> Result<Option<u32>> {
        self.get(EPUB_TOCDEPTH)
            .map(|value| {
                value.parse::<u32>().map_err(|_| SetupError::InvalidOption {
                    option: EPUB_TOCDEPTH.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Resolve the configured cover page, if any.
    pub fn resolve_cover_page(&self) -> Result<Option<ResolvedPath>> {
        self.cover_page()
            .map(|raw| resolve_relative_path(raw, self.base_dir()))
            .transpose()
    }
}
