use crate::error::{Result, SetupError};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A path that pointed at an existing regular file when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Resolve a file path referenced from the override file.
///
/// The path is tried as given first (relative to the working directory, or
/// absolute), then relative to `base_dir`. Either way the result is an
/// existing regular file or an error naming the last path tried.
pub fn resolve_relative_path<P: AsRef<Path>, B: AsRef<Path>>(
    raw_path: P,
    base_dir: B,
) -> Result<ResolvedPath> {
    let raw_path = raw_path.as_ref();
    if raw_path.is_file() {
        return Ok(ResolvedPath(raw_path.to_path_buf()));
    }

    let candidate = base_dir.as_ref().join(raw_path);
    log::debug!(
        "`{}` not found, trying `{}`",
        raw_path.display(),
        candidate.display()
    );
    if candidate.is_file() {
        Ok(ResolvedPath(candidate))
    } else {
        Err(SetupError::ReferencedFileNotFound { path: candidate })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn absolute_existing_path_is_unchanged() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let file = dir.path().join("cover.pdf");
        std::fs::write(&file, b"pdf").expect("can write file");

        let resolved = resolve_relative_path(&file, "/somewhere/else").expect("can resolve");
        assert_eq!(resolved.as_path(), file);

        let again = resolve_relative_path(resolved.as_path(), "/somewhere/else")
            .expect("can resolve twice");
        assert_eq!(again, resolved);
    }

    #[test]
    fn falls_back_to_base_dir() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::create_dir(dir.path().join("covers")).expect("can create dir");
        let file = dir.path().join("covers").join("book-cover-unlikely-name.pdf");
        std::fs::write(&file, b"pdf").expect("can write file");

        let resolved = resolve_relative_path("covers/book-cover-unlikely-name.pdf", dir.path())
            .expect("can resolve");
        assert_eq!(resolved.as_path(), file);
    }

    #[test]
    fn fails_when_neither_candidate_exists() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let err = resolve_relative_path("missing-cover.pdf", dir.path()).unwrap_err();
        match err {
            SetupError::ReferencedFileNotFound { path } => {
                assert_eq!(path, dir.path().join("missing-cover.pdf"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directories_do_not_resolve() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::create_dir(dir.path().join("not-a-file")).expect("can create dir");
        assert!(resolve_relative_path("not-a-file", dir.path()).is_err());
    }
}
