use std::sync::Arc;

use image::RgbaImage;
use rayon::prelude::*;

use crate::assets::font::{EmbeddedFont, FontSource, OverlayFace};
use crate::encode::png::encode_png;
use crate::encode::preview::PreviewAssets;
use crate::foundation::core::ModuleMatrix;
use crate::foundation::error::{QrError, QrResult};
use crate::render::raster::render_raster;
use crate::render::svg::render_svg;
use crate::render::svg_raster::{ParityReport, module_parity, rasterize_svg};
use crate::style::config::{Style, StyleConfig, StyleLimits};
use crate::style::geometry::Geometry;

/// Options fixed for the lifetime of a [`Renderer`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Accepted ranges for style values.
    pub limits: StyleLimits,
    /// Floor for the overlay font size in pixels.
    pub min_font_px: u32,
    /// Overlay font provider, consulted once in [`Renderer::new`].
    pub font: Arc<dyn FontSource>,
    /// Worker threads for [`Renderer::render_many`]. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            limits: StyleLimits::default(),
            min_font_px: 12,
            font: Arc::new(EmbeddedFont),
            threads: None,
        }
    }
}

impl RenderOpts {
    /// Replace the style limits.
    pub fn with_limits(mut self, limits: StyleLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the overlay font size floor.
    pub fn with_min_font_px(mut self, px: u32) -> Self {
        self.min_font_px = px;
        self
    }

    /// Set the overlay font provider.
    pub fn with_font(mut self, font: impl FontSource + 'static) -> Self {
        self.font = Arc::new(font);
        self
    }

    /// Render batches on a dedicated pool of `n` threads.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }
}

/// One rendered SVG/PNG pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedAssets {
    /// SVG document text.
    pub svg_text: String,
    /// 8-bit RGBA PNG bytes.
    pub png_bytes: Vec<u8>,
    /// Side length of both outputs in pixels.
    pub canvas: u32,
}

/// Stateless renderer for styled QR codes.
///
/// Construction resolves the overlay font once; every render call after that is a pure function
/// of its inputs, so one renderer can be shared across threads.
#[derive(Debug)]
pub struct Renderer {
    opts: RenderOpts,
    face: OverlayFace,
    pool: Option<rayon::ThreadPool>,
}

impl Renderer {
    /// Build a renderer, loading and checking the overlay font.
    pub fn new(opts: RenderOpts) -> QrResult<Self> {
        if opts.min_font_px == 0 {
            return Err(QrError::validation("min_font_px must be >= 1"));
        }
        let face = OverlayFace::load(opts.font.as_ref())?;
        let pool = opts.threads.map(build_thread_pool).transpose()?;
        tracing::debug!(
            outline_font = matches!(face, OverlayFace::Outline(_)),
            threads = ?opts.threads,
            "renderer ready"
        );
        Ok(Self { opts, face, pool })
    }

    /// Options this renderer was built with.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Validate a style against this renderer's limits.
    pub fn validate(&self, config: &StyleConfig) -> QrResult<Style> {
        config.validate(&self.opts.limits)
    }

    /// Validate `config` and render both outputs.
    #[tracing::instrument(skip_all, fields(modules = matrix.modules()))]
    pub fn render(&self, matrix: &ModuleMatrix, config: &StyleConfig) -> QrResult<RenderedAssets> {
        let style = self.validate(config)?;
        self.render_style(matrix, &style)
    }

    /// Render both outputs for an already validated style.
    pub fn render_style(&self, matrix: &ModuleMatrix, style: &Style) -> QrResult<RenderedAssets> {
        let geom = Geometry::resolve(matrix, style);
        let svg = render_svg(matrix, style, &geom)?;
        let img = render_raster(matrix, style, &geom, &self.face, self.opts.min_font_px)?;
        let png = encode_png(&img)?;
        tracing::debug!(
            canvas = geom.canvas,
            svg_bytes = svg.len(),
            png_bytes = png.len(),
            "rendered"
        );
        Ok(RenderedAssets {
            svg_text: svg,
            png_bytes: png,
            canvas: geom.canvas,
        })
    }

    /// Render only the raster form, before PNG encoding.
    pub fn render_image(&self, matrix: &ModuleMatrix, style: &Style) -> QrResult<RgbaImage> {
        let geom = Geometry::resolve(matrix, style);
        render_raster(matrix, style, &geom, &self.face, self.opts.min_font_px)
    }

    /// Validate and render for preview, without touching the filesystem.
    pub fn preview(&self, matrix: &ModuleMatrix, config: &StyleConfig) -> QrResult<PreviewAssets> {
        self.render(matrix, config).map(|a| PreviewAssets::encode(&a))
    }

    /// Render a batch in parallel.
    ///
    /// Results keep input order and each equals what [`Renderer::render`] returns for that item.
    #[tracing::instrument(skip_all, fields(jobs = jobs.len()))]
    pub fn render_many(
        &self,
        jobs: &[(ModuleMatrix, StyleConfig)],
    ) -> Vec<QrResult<RenderedAssets>> {
        let run = || -> Vec<QrResult<RenderedAssets>> {
            jobs.par_iter()
                .map(|(matrix, config)| self.render(matrix, config))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Compare the vector and raster outputs module by module.
    ///
    /// The overlay label is left out of the raster side since the vector form has none.
    #[tracing::instrument(skip_all, fields(modules = matrix.modules()))]
    pub fn check_parity(
        &self,
        matrix: &ModuleMatrix,
        config: &StyleConfig,
    ) -> QrResult<ParityReport> {
        let style = self.validate(config)?.without_overlay();
        let geom = Geometry::resolve(matrix, &style);
        let vector = rasterize_svg(&render_svg(matrix, &style, &geom)?)?;
        let raster = render_raster(matrix, &style, &geom, &self.face, self.opts.min_font_px)?;
        module_parity(matrix, &style, &geom, &vector, &raster)
    }
}

fn build_thread_pool(threads: usize) -> QrResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(QrError::validation("threads must be >= 1 when set"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| QrError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
