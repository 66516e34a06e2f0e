//! Explicit build environment handed to the build hook.
//!
//! Everything the hook would otherwise read from process-wide environment
//! variables lives here, so the hook can be driven and tested without
//! touching the environment. The CLI fills it from flags, each of which can
//! also come from its traditional environment variable.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "build-manifest.json";

/// The output format produced by a build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    Web,
    Ebook,
    Other,
}

impl BuildTarget {
    /// Infer the target from the name of the output directory, the way
    /// builders lay out `_build/html`, `_build/epub` and so on.
    pub fn from_outdir(outdir: &Path) -> BuildTarget {
        let name = outdir
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.contains("html") {
            BuildTarget::Web
        } else if name.contains("epub") {
            BuildTarget::Ebook
        } else {
            BuildTarget::Other
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTarget::Web => write!(f, "web"),
            BuildTarget::Ebook => write!(f, "ebook"),
            BuildTarget::Other => write!(f, "other"),
        }
    }
}

#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(setter(into))]
pub struct BuildContext {
    /// Override file to load, if any.
    #[builder(setter(into, strip_option), default)]
    pub overrides_file: Option<PathBuf>,
    /// Leave internal and unfinished material out of the build.
    #[builder(default)]
    pub exclude_internal: bool,
    /// Newline-delimited list of books to leave out of the build.
    #[builder(setter(into, strip_option), default)]
    pub hidden_books: Option<PathBuf>,
    /// Test builds run without a prior asset bundling step.
    #[builder(default)]
    pub testing: bool,
    /// Local builds tolerate a missing asset manifest.
    #[builder(default)]
    pub local_build: bool,
    /// Output directory of the current build.
    #[builder(default)]
    pub outdir: PathBuf,
    /// Directory holding the asset manifest. Empty means the working
    /// directory.
    #[builder(default)]
    pub manifest_dir: PathBuf,
}

impl BuildContext {
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_dir.join(MANIFEST_FILE_NAME)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_build_context_with_builder_pattern() {
        let context = BuildContextBuilder::default()
            .testing(true)
            .outdir("_build/html")
            .hidden_books("hidden.txt")
            .build()
            .expect("can build context");

        assert!(context.testing);
        assert!(!context.local_build);
        assert!(!context.exclude_internal);
        assert_eq!(context.overrides_file, None);
        assert_eq!(context.hidden_books, Some(PathBuf::from("hidden.txt")));
        assert_eq!(context.manifest_path(), PathBuf::from(MANIFEST_FILE_NAME));
    }

    #[test]
    fn can_infer_target_from_outdir() {
        assert_eq!(
            BuildTarget::from_outdir(Path::new("_build/html")),
            BuildTarget::Web
        );
        assert_eq!(
            BuildTarget::from_outdir(Path::new("/tmp/out/singlehtml")),
            BuildTarget::Web
        );
        assert_eq!(
            BuildTarget::from_outdir(Path::new("_build/epub")),
            BuildTarget::Ebook
        );
        assert_eq!(
            BuildTarget::from_outdir(Path::new("_build/latex")),
            BuildTarget::Other
        );
        assert_eq!(
            BuildTarget::from_outdir(Path::new("html/latex")),
            BuildTarget::Other
        );
    }
}
