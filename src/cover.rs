//! E-book cover image rendering.
//!
//! The cover source is a PDF; its first page is rasterized at 72 DPI,
//! scaled to a fixed width with the height following the aspect ratio, and
//! written as a JPEG where the e-book packaging step expects it.
//! Rasterization itself is delegated to poppler's `pdftoppm`.

use crate::error::{Result, SetupError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where the cover lands, relative to the build output directory.
pub const COVER_IMAGE_PATH: &str = "_static/cover.jpeg";
/// Cover template used by the e-book builder alongside the image.
pub const COVER_TEMPLATE: &str = "epub-cover.html";
pub const COVER_DPI: u32 = 72;
pub const COVER_WIDTH: u32 = 2560;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub dpi: u32,
    /// Target width in pixels; height follows the page's aspect ratio.
    pub width: u32,
    pub first_page: u32,
    pub last_page: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            dpi: COVER_DPI,
            width: COVER_WIDTH,
            first_page: 1,
            last_page: 1,
        }
    }
}

/// Turns pages of a PDF into bitmaps.
pub trait PageRasterizer {
    /// Rasterize the requested page range, one image per page in page order.
    fn rasterize(&self, pdf: &Path, options: &RasterOptions) -> Result<Vec<DynamicImage>>;
}

/// Rasterizer backed by the `pdftoppm` executable.
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    program: PathBuf,
}

impl Pdftoppm {
    /// `program` is a path or a name looked up on `PATH`.
    pub fn with_program<P: Into<PathBuf>>(program: P) -> Pdftoppm {
        Pdftoppm {
            program: program.into(),
        }
    }
}

impl PageRasterizer for Pdftoppm {
    fn rasterize(&self, pdf: &Path, options: &RasterOptions) -> Result<Vec<DynamicImage>> {
        let failure = |message: String| SetupError::ImageRenderFailure {
            path: pdf.to_path_buf(),
            message,
        };

        let program = which::which(&self.program).map_err(|e| {
            failure(format!(
                "cannot locate `{}`: {e}",
                self.program.display()
            ))
        })?;

        let mut images = Vec::new();
        // pdftoppm writes a single page to stdout when no output root is given
        for page in options.first_page..=options.last_page {
            log::debug!("Rasterizing page {page} of {}", pdf.display());
            let output = Command::new(&program)
                .arg("-f")
                .arg(page.to_string())
                .arg("-l")
                .arg(page.to_string())
                .arg("-r")
                .arg(options.dpi.to_string())
                .arg("-scale-to-x")
                .arg(options.width.to_string())
                .arg("-scale-to-y")
                .arg("-1")
                .arg("-png")
                .arg("-singlefile")
                .arg(pdf)
                .output()
                .map_err(|e| failure(format!("failed to run `{}`: {e}", program.display())))?;

            if !output.status.success() {
                return Err(failure(format!(
                    "`{}` exited with {}: {}",
                    program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }

            let image = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)
                .map_err(|e| failure(format!("cannot decode page {page}: {e}")))?;
            images.push(image);
        }

        Ok(images)
    }
}

/// Render the cover for `pdf` into `outdir`, returning the written path.
///
/// Only the first rasterized page is used; anything after it is dropped.
pub fn render_cover(
    pdf: &Path,
    outdir: &Path,
    rasterizer: &dyn PageRasterizer,
) -> Result<PathBuf> {
    let options = RasterOptions::default();
    let page = rasterizer
        .rasterize(pdf, &options)?
        .into_iter()
        .next()
        .ok_or_else(|| SetupError::ImageRenderFailure {
            path: pdf.to_path_buf(),
            message: "document has no pages".to_string(),
        })?;

    let page = scale_to_width(page, options.width);

    let cover_path = outdir.join(COVER_IMAGE_PATH);
    if let Some(parent) = cover_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SetupError::io(parent, e))?;
    }

    // JPEG has no alpha channel
    page.to_rgb8()
        .save_with_format(&cover_path, ImageFormat::Jpeg)
        .map_err(|e| match e {
            ImageError::IoError(source) => SetupError::io(&cover_path, source),
            other => SetupError::ImageRenderFailure {
                path: pdf.to_path_buf(),
                message: other.to_string(),
            },
        })?;

    log::info!("Wrote cover image {}", cover_path.display());
    Ok(cover_path)
}

fn scale_to_width(image: DynamicImage, width: u32) -> DynamicImage {
    if image.width() == width || image.width() == 0 {
        return image;
    }
    let height = ((image.height() as u64 * width as u64) as f64 / image.width() as f64)
        .round()
        .max(1.0) as u32;
    image.resize_exact(width, height, FilterType::Lanczos3)
}
