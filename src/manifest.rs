//! Generated asset manifest.
//!
//! An earlier bundling step writes `build-manifest.json`, mapping each chunk
//! to the stylesheets and scripts it produced. Chunk order follows the file;
//! order inside each list is the order the assets must be loaded in.

use crate::error::{Result, SetupError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Chunk {
    #[serde(default)]
    pub css: Option<Vec<String>>,
    #[serde(default)]
    pub js: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    pub chunks: IndexMap<String, Chunk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Css,
    Js,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Css => write!(f, "css"),
            AssetKind::Js => write!(f, "js"),
        }
    }
}

/// One stylesheet or script the page generator should add to every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRegistration {
    pub kind: AssetKind,
    pub file: String,
}

impl AssetManifest {
    /// Read the manifest at `path`.
    ///
    /// A missing file is reported as `ManifestMissing` so the caller can
    /// decide whether the build tolerates it.
    pub fn load(path: &Path) -> Result<AssetManifest> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SetupError::ManifestMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(SetupError::io(path, e)),
        };

        AssetManifest::parse(&contents).map_err(|source| SetupError::ManifestMalformed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<AssetManifest, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Flatten the manifest into registrations: chunks in manifest order,
    /// and within a chunk its stylesheets then its scripts.
    pub fn registrations(&self) -> Vec<AssetRegistration> {
        let mut registrations = Vec::new();
        for chunk in self.chunks.values() {
            let css = chunk.css.iter().flatten().map(|file| AssetRegistration {
                kind: AssetKind::Css,
                file: file.clone(),
            });
            let js = chunk.js.iter().flatten().map(|file| AssetRegistration {
                kind: AssetKind::Js,
                file: file.clone(),
            });
            registrations.extend(css.chain(js));
        }
        registrations
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_order_within_chunk() {
        let manifest =
            AssetManifest::parse(r#"{"main": {"css": ["a.css", "b.css"], "js": ["x.js"]}}"#)
                .expect("can parse manifest");

        let files: Vec<_> = manifest
            .registrations()
            .into_iter()
            .map(|r| (r.kind, r.file))
            .collect();
        assert_eq!(
            files,
            vec![
                (AssetKind::Css, "a.css".to_string()),
                (AssetKind::Css, "b.css".to_string()),
                (AssetKind::Js, "x.js".to_string()),
            ]
        );
    }

    #[test]
    fn chunks_may_omit_either_list() {
        let manifest = AssetManifest::parse(
            r#"{"styles": {"css": ["s.css"]}, "scripts": {"js": ["a.js", "b.js"]}, "empty": {}}"#,
        )
        .expect("can parse manifest");

        assert_eq!(manifest.chunks.len(), 3);
        assert_eq!(manifest.chunks["empty"], Chunk::default());
        let files: Vec<_> = manifest.registrations().into_iter().map(|r| r.file).collect();
        assert_eq!(files, vec!["s.css", "a.js", "b.js"]);
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let err = AssetManifest::load(&dir.path().join("build-manifest.json")).unwrap_err();
        assert!(matches!(err, SetupError::ManifestMissing { .. }));
    }

    #[test]
    fn malformed_file_is_reported_as_malformed() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("build-manifest.json");
        std::fs::write(&path, "{\"main\": [").expect("can write manifest");
        let err = AssetManifest::load(&path).unwrap_err();
        assert!(matches!(err, SetupError::ManifestMalformed { .. }));
    }
}
