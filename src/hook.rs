//! Build-start hook.
//!
//! Runs once per build with the target being produced and returns what the
//! page generator should apply: redirects and assets for web builds, the
//! cover image for e-book builds. The only side effect is writing the cover.

use crate::config::Configuration;
use crate::context::{BuildContext, BuildTarget};
use crate::cover::{render_cover, PageRasterizer};
use crate::error::{Result, SetupError};
use crate::manifest::{AssetManifest, AssetRegistration};
use crate::overrides::BuildOverrides;
use crate::redirects::{Redirect, RedirectTable};
use serde::Serialize;
use std::path::PathBuf;

/// Template directory added for web builds.
pub const WEB_TEMPLATES_PATH: &str = "_templates";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HookOutcome {
    pub redirects: Vec<Redirect>,
    /// Assets in registration order.
    pub assets: Vec<AssetRegistration>,
    pub templates_path: Vec<String>,
    pub cover_image: Option<PathBuf>,
    pub warnings: Vec<String>,
}

pub fn on_build_start(
    target: BuildTarget,
    overrides: &BuildOverrides,
    context: &BuildContext,
    config: &Configuration,
    rasterizer: &dyn PageRasterizer,
) -> Result<HookOutcome> {
    log::debug!("Build starting for target {target}");
    match target {
        BuildTarget::Web => web(context, config),
        BuildTarget::Ebook => ebook(overrides, context, rasterizer),
        BuildTarget::Other => Ok(HookOutcome::default()),
    }
}

fn web(context: &BuildContext, config: &Configuration) -> Result<HookOutcome> {
    let mut outcome = HookOutcome {
        templates_path: vec![WEB_TEMPLATES_PATH.to_string()],
        ..HookOutcome::default()
    };

    let mut redirects = RedirectTable::new();
    redirects.extend_from(&config.redirects);
    outcome.redirects = redirects.iter().collect();

    if context.testing {
        log::debug!("Testing build, skipping asset injection");
        return Ok(outcome);
    }

    let manifest_path = context.manifest_path();
    let manifest = match AssetManifest::load(&manifest_path) {
        Ok(manifest) => manifest,
        Err(SetupError::ManifestMissing { path }) if context.local_build => {
            let warning = format!("{} not available", path.display());
            log::warn!("{warning}");
            outcome.warnings.push(warning);
            return Ok(outcome);
        }
        Err(e) => return Err(e),
    };

    for asset in manifest.registrations() {
        log::info!("Adding {} to {}...", asset.file, asset.kind);
        outcome.assets.push(asset);
    }

    Ok(outcome)
}

fn ebook(
    overrides: &BuildOverrides,
    context: &BuildContext,
    rasterizer: &dyn PageRasterizer,
) -> Result<HookOutcome> {
    let Some(cover_page) = overrides.resolve_cover_page()? else {
        return Ok(HookOutcome::default());
    };

    let cover_image = render_cover(cover_page.as_path(), &context.outdir, rasterizer)?;
    Ok(HookOutcome {
        cover_image: Some(cover_image),
        ..HookOutcome::default()
    })
}
