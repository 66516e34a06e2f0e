//! Source exclusion patterns.
//!
//! Patterns are matched against source paths relative to the documentation
//! root. `*` and `**` both match across directory separators, and a path is
//! excluded when it or any directory above it matches, so excluding a
//! directory excludes everything inside it.

use crate::context::BuildContext;
use crate::error::{Result, SetupError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "_build",
    "Thumbs.db",
    ".DS_Store",
    "old-content",
    "sass",
    "**/node_modules",
    "internal",
    "**/package.json",
    "**/webpack.config.js",
    "built",
    "dist",
    "src",
];

/// Excludes internal and unfinished material from final site builds.
pub const INTERNAL_PATTERN: &str = "**internal/**";

#[derive(Debug, Clone)]
pub struct ExcludePatterns {
    patterns: Vec<String>,
    set: GlobSet,
    include_todos: bool,
}

impl ExcludePatterns {
    /// Assemble the exclusion list for a build.
    pub fn build(context: &BuildContext) -> Result<ExcludePatterns> {
        let mut patterns: Vec<String> = DEFAULT_EXCLUDE_PATTERNS
            .iter()
            .map(ToString::to_string)
            .collect();

        if context.exclude_internal {
            patterns.push(INTERNAL_PATTERN.to_string());
        }

        if let Some(hidden_books) = context
            .hidden_books
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            let contents = std::fs::read_to_string(hidden_books).map_err(|source| {
                SetupError::HiddenBooksUnreadable {
                    path: hidden_books.to_path_buf(),
                    source,
                }
            })?;
            let hidden = hidden_book_patterns(&contents);
            log::debug!(
                "Hiding {} book(s) listed in {}",
                hidden.len(),
                hidden_books.display()
            );
            patterns.extend(hidden);
        }

        ExcludePatterns::from_patterns(patterns, !context.exclude_internal)
    }

    fn from_patterns(patterns: Vec<String>, include_todos: bool) -> Result<ExcludePatterns> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|source| SetupError::InvalidExcludePattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| SetupError::InvalidExcludePattern {
                pattern: patterns.join(", "),
                source,
            })?;

        Ok(ExcludePatterns {
            patterns,
            set,
            include_todos,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `todo` directives produce output. Only builds that keep
    /// internal material show them.
    pub fn include_todos(&self) -> bool {
        self.include_todos
    }

    pub fn is_excluded<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref()
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .any(|p| self.set.is_match(p))
    }
}

/// One `**<book>/**` pattern per non-empty line.
fn hidden_book_patterns(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|book| format!("**{book}/**"))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::BuildContextBuilder;

    #[test]
    fn defaults_exclude_build_artifacts() {
        let excludes = ExcludePatterns::build(&BuildContext::default()).expect("can build");
        assert_eq!(excludes.patterns().len(), DEFAULT_EXCLUDE_PATTERNS.len());
        assert!(excludes.include_todos());

        assert!(excludes.is_excluded("_build/html/index.html"));
        assert!(excludes.is_excluded("frontend/node_modules/react/index.js"));
        assert!(excludes.is_excluded("package.json"));
        assert!(excludes.is_excluded("internal/notes.rst"));
        assert!(!excludes.is_excluded("courses/intro-to-ada/index.rst"));
        assert!(!excludes.is_excluded("courses/internal/index.rst"));
    }

    #[test]
    fn site_builds_drop_nested_internal_material() {
        let context = BuildContextBuilder::default()
            .exclude_internal(true)
            .build()
            .expect("can build context");
        let excludes = ExcludePatterns::build(&context).expect("can build");

        assert!(!excludes.include_todos());
        assert_eq!(excludes.patterns().last().map(String::as_str), Some(INTERNAL_PATTERN));
        assert!(excludes.is_excluded("courses/internal/index.rst"));
        assert!(!excludes.is_excluded("courses/intro-to-ada/index.rst"));
    }

    #[test]
    fn hidden_books_become_patterns() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let list = dir.path().join("hidden.txt");
        std::fs::write(&list, "courses/advanced-ada\n\n  labs/bug-free-coding  \n")
            .expect("can write list");

        let context = BuildContextBuilder::default()
            .hidden_books(list)
            .build()
            .expect("can build context");
        let excludes = ExcludePatterns::build(&context).expect("can build");

        let patterns = excludes.patterns();
        assert_eq!(
            &patterns[patterns.len() - 2..],
            &[
                "**courses/advanced-ada/**".to_string(),
                "**labs/bug-free-coding/**".to_string()
            ]
        );
        assert!(excludes.is_excluded("courses/advanced-ada/chapters/generics.rst"));
        assert!(!excludes.is_excluded("courses/intro-to-ada/chapters/generics.rst"));
    }

    #[test]
    fn unreadable_hidden_books_file_is_fatal() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let context = BuildContextBuilder::default()
            .hidden_books(dir.path().join("missing.txt"))
            .build()
            .expect("can build context");
        let err = ExcludePatterns::build(&context).unwrap_err();
        assert!(matches!(err, SetupError::HiddenBooksUnreadable { .. }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(hidden_book_patterns("\n \n\t\n"), Vec::<String>::new());
        assert_eq!(hidden_book_patterns("a\r\nb"), vec!["**a/**", "**b/**"]);
    }
}
