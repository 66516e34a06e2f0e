//! Project metadata and the per-format settings derived from it.
//!
//! Everything here is a function of the project configuration, the build
//! overrides and today's date. The result is handed to the documentation
//! driver as data; nothing in this module writes files.

use crate::config::ProjectConfig;
use crate::cover::{COVER_IMAGE_PATH, COVER_TEMPLATE};
use crate::error::Result;
use crate::overrides::BuildOverrides;
use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_EPUB_TOCDEPTH: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatexDocument {
    pub source: String,
    pub target: String,
    pub title: String,
    pub author: String,
    pub document_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatexSettings {
    pub releasename: String,
    /// Title page replacing the default one when a cover page is configured.
    pub maketitle: Option<String>,
    pub toplevel_sectioning: Option<String>,
    pub documents: Vec<LatexDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpubCover {
    pub image: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpubSettings {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub copyright: String,
    pub description: String,
    pub cover: Option<EpubCover>,
    pub tocdepth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManPage {
    pub source: String,
    pub name: String,
    pub description: String,
    pub authors: Vec<String>,
    pub section: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TexinfoDocument {
    pub source: String,
    pub target: String,
    pub title: String,
    pub author: String,
    pub dir_entry: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSettings {
    pub project: String,
    pub copyright: String,
    pub publisher: String,
    pub author: String,
    pub title: String,
    /// Short version; `YYYY.MM` unless overridden.
    pub version: String,
    /// Full release; `YYYY-MM` unless overridden.
    pub release: String,
    /// `Release` for date-based builds, `Version` for explicit versions.
    pub release_name: String,
    pub year: String,
    pub latex: LatexSettings,
    pub epub: EpubSettings,
    pub man_pages: Vec<ManPage>,
    pub texinfo_documents: Vec<TexinfoDocument>,
}

impl ProjectSettings {
    pub fn resolve(
        config: &ProjectConfig,
        overrides: &BuildOverrides,
        today: NaiveDate,
    ) -> Result<ProjectSettings> {
        let author = overrides
            .author()
            .unwrap_or(&config.default_author)
            .to_string();
        let title = overrides
            .title()
            .unwrap_or(&config.default_title)
            .to_string();

        let (version, release, release_name) = match overrides.version() {
            Some(version) => (version.to_string(), version.to_string(), "Version"),
            None => (
                today.format("%Y.%m").to_string(),
                today.format("%Y-%m").to_string(),
                "Release",
            ),
        };

        let cover_page = overrides.resolve_cover_page()?;

        let latex = LatexSettings {
            releasename: release_name.to_string(),
            maketitle: cover_page.as_ref().map(|pdf| latex_title_page(&pdf.to_string())),
            toplevel_sectioning: overrides.latex_toplevel_sectioning().map(ToString::to_string),
            documents: vec![LatexDocument {
                source: config.master_doc.clone(),
                target: format!("{}.tex", config.target_name),
                title: title.clone(),
                author: author.clone(),
                document_class: "manual".to_string(),
            }],
        };

        let epub = EpubSettings {
            title: title.clone(),
            author: author.replace(r" \\and", " and"),
            publisher: config.publisher.clone(),
            copyright: config.copyright.clone(),
            description: format!("{release_name} {release}"),
            cover: cover_page.as_ref().map(|_| EpubCover {
                image: COVER_IMAGE_PATH.to_string(),
                template: COVER_TEMPLATE.to_string(),
            }),
            tocdepth: overrides
                .epub_tocdepth()?
                .unwrap_or(DEFAULT_EPUB_TOCDEPTH),
        };

        let man_pages = vec![ManPage {
            source: config.master_doc.clone(),
            name: config.target_name.clone(),
            description: title.clone(),
            authors: vec![author.clone()],
            section: 1,
        }];

        let texinfo_documents = vec![TexinfoDocument {
            source: config.master_doc.clone(),
            target: config.target_name.clone(),
            title: title.clone(),
            author: author.clone(),
            dir_entry: config.target_name.clone(),
            description: "One line description of project.".to_string(),
            category: "Miscellaneous".to_string(),
        }];

        Ok(ProjectSettings {
            project: config.name.clone(),
            copyright: config.copyright.clone(),
            publisher: config.publisher.clone(),
            author,
            title,
            version,
            release,
            release_name: release_name.to_string(),
            year: today.format("%Y").to_string(),
            latex,
            epub,
            man_pages,
            texinfo_documents,
        })
    }
}

fn latex_title_page(pdf: &str) -> String {
    format!(
        r"
\begin{{titlepage}}
\includepdf{{{pdf}}}
\sphinxmaketitle
\end{{titlepage}}
"
    )
}
