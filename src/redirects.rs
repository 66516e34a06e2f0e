//! Redirects from retired document paths and the stub pages that serve them.

use crate::error::{Result, SetupError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Retired document path, without extension.
    pub from: String,
    /// Replacement, relative to the retired page.
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    entries: BTreeMap<String, String>,
}

impl RedirectTable {
    pub fn new() -> RedirectTable {
        RedirectTable::default()
    }

    /// Add entries; an existing source path takes the new target.
    pub fn extend_from<'a, I>(&mut self, redirects: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (from, to) in redirects {
            self.entries.insert(from.clone(), to.clone());
        }
    }

    /// Entries sorted by source path.
    pub fn iter(&self) -> impl Iterator<Item = Redirect> + '_ {
        self.entries.iter().map(|(from, to)| Redirect {
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Write one stub page per entry below `outdir`, returning the files
    /// written.
    pub fn write_stubs(&self, outdir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.entries.len());
        for redirect in self.iter() {
            let path = redirect.stub_path(outdir);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SetupError::io(parent, e))?;
            }
            std::fs::write(&path, render_stub(&redirect.to))
                .map_err(|e| SetupError::io(&path, e))?;
            log::debug!("Wrote redirect {} -> {}", redirect.from, redirect.to);
            written.push(path);
        }
        Ok(written)
    }
}

impl Redirect {
    pub fn stub_path(&self, outdir: &Path) -> PathBuf {
        outdir.join(format!("{}.html", self.from.trim_start_matches('/')))
    }
}

/// Render an HTML page that forwards readers to `target`.
pub fn render_stub(target: &str) -> String {
    let attribute = html_escape::encode_double_quoted_attribute(target);
    // JSON string literals are valid JS; `</` must not close the script early
    let script = serde_json::Value::String(target.to_string())
        .to_string()
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8"/>
    <noscript>
        <meta http-equiv="refresh" content="0; url={attribute}"/>
    </noscript>
    <script>
        window.location.replace({script} + window.location.hash);
    </script>
</head>
<body>
    <p>This page has moved to <a href="{attribute}">{attribute}</a>.</p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> RedirectTable {
        let config: BTreeMap<String, String> = [
            ("b/index", "../c/"),
            ("a/index", "../z/"),
        ]
        .into_iter()
        .map(|(f, t)| (f.to_string(), t.to_string()))
        .collect();
        let mut table = RedirectTable::new();
        table.extend_from(&config);
        table
    }

    #[test]
    fn iterates_sorted_by_source() {
        let from: Vec<_> = table().iter().map(|r| r.from).collect();
        assert_eq!(from, vec!["a/index", "b/index"]);
    }

    #[test]
    fn stub_points_at_target() {
        let html = render_stub("../GNAT_Toolchain_Intro/");
        assert!(html.contains(r#"content="0; url=../GNAT_Toolchain_Intro/""#));
        assert!(html.contains(r#"window.location.replace("../GNAT_Toolchain_Intro/""#));
    }

    #[test]
    fn stub_escapes_target() {
        let html = render_stub(r#"x"</script><b>"#);
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("&quot;"));
    }

    #[test]
    fn can_write_stubs() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let written = table().write_stubs(dir.path()).expect("can write stubs");
        assert_eq!(written.len(), 2);
        assert_eq!(written[0], dir.path().join("a/index.html"));

        let contents = std::fs::read_to_string(&written[1]).expect("can read stub");
        assert!(contents.contains("url=../c/"));
    }
}
