//! Vector/raster equivalence checks.
//!
//! The SVG output is rasterized with `resvg` and compared module by module against the direct
//! raster output. Both renderers place modules through [`Geometry::module_rect`], so any
//! disagreement points at a bug in one of them.

use image::RgbaImage;
use serde::Serialize;

use crate::foundation::core::{ModuleMatrix, Rgba8};
use crate::foundation::error::{QrError, QrResult};
use crate::render::composite::unpremultiply;
use crate::render::mask::rounded_mask;
use crate::style::config::Style;
use crate::style::geometry::Geometry;

/// Smallest module side, in pixels, for which a center sample is exact in both renderers.
pub const MIN_PARITY_MODULE_PX: f64 = 2.0;

/// Rasterize an SVG document at its intrinsic size into a straight-alpha RGBA image.
pub fn rasterize_svg(svg: &str) -> QrResult<RgbaImage> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| QrError::render(format!("parse svg: {e}")))?;

    let size = tree.size();
    let to_px = |v: f32| -> QrResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(QrError::render("svg has invalid width/height"));
        }
        Ok(v.ceil() as u32)
    };
    let (w, h) = (to_px(size.width())?, to_px(size.height())?);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| QrError::render("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    let straight: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| unpremultiply([px[0], px[1], px[2], px[3]]))
        .collect();
    RgbaImage::from_raw(w, h, straight)
        .ok_or_else(|| QrError::render("svg pixmap size does not match its buffer"))
}

/// Outcome of comparing module centers between two renderings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParityReport {
    /// Modules sampled in both images.
    pub checked: usize,
    /// Modules skipped because their center pixel falls in a rounded-off corner.
    pub masked: usize,
    /// `(x, y)` of every module whose classification differs.
    pub mismatched: Vec<(usize, usize)>,
}

impl ParityReport {
    /// `true` when every checked module agrees.
    pub fn is_consistent(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Classify each module center as foreground or background in `vector` and `raster`.
///
/// The overlay label must not be drawn into `raster`: it only exists in the raster form. Module
/// centers that the corner mask clears are counted as masked, not compared, because the vector
/// form clips only its background rect.
pub fn module_parity(
    matrix: &ModuleMatrix,
    style: &Style,
    geom: &Geometry,
    vector: &RgbaImage,
    raster: &RgbaImage,
) -> QrResult<ParityReport> {
    if geom.module_size < MIN_PARITY_MODULE_PX {
        return Err(QrError::validation(format!(
            "modules are {:.3} px; parity needs at least {MIN_PARITY_MODULE_PX} px",
            geom.module_size
        )));
    }
    let dims = (geom.canvas, geom.canvas);
    if vector.dimensions() != dims || raster.dimensions() != dims {
        return Err(QrError::render(format!(
            "parity images are {:?} and {:?}, expected {dims:?}",
            vector.dimensions(),
            raster.dimensions()
        )));
    }

    let mask = (geom.radius > 0).then(|| rounded_mask(geom.canvas, geom.radius));
    let fg = style.foreground();
    let bg = style.background();

    let mut report = ParityReport::default();
    for y in 0..matrix.modules() {
        for x in 0..matrix.modules() {
            let center = geom.module_rect(x, y).center();
            let (px, py) = (center.x.floor() as u32, center.y.floor() as u32);
            if let Some(mask) = &mask
                && mask.get_pixel(px, py).0[0] == 0
            {
                report.masked += 1;
                continue;
            }
            report.checked += 1;
            let a = is_foreground(vector.get_pixel(px, py).0, fg, bg);
            let b = is_foreground(raster.get_pixel(px, py).0, fg, bg);
            if a != b {
                report.mismatched.push((x, y));
            }
        }
    }
    tracing::debug!(
        checked = report.checked,
        masked = report.masked,
        mismatched = report.mismatched.len(),
        "module parity"
    );
    Ok(report)
}

fn is_foreground(px: [u8; 4], fg: Rgba8, bg: Rgba8) -> bool {
    let dist = |c: Rgba8| -> u32 {
        px.iter()
            .zip(c.to_array())
            .map(|(&a, b)| u32::from(a.abs_diff(b)).pow(2))
            .sum()
    };
    dist(fg) < dist(bg)
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg_raster.rs"]
mod tests;
