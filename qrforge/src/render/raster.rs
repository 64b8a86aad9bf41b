use image::{Rgba, RgbaImage};

use crate::assets::font::OverlayFace;
use crate::foundation::core::{ModuleMatrix, Rect};
use crate::foundation::error::{QrError, QrResult};
use crate::foundation::math::first_pixel_at_or_after;
use crate::render::composite::apply_mask;
use crate::render::mask::rounded_mask;
use crate::render::text::{OverlaySpec, draw_overlay, overlay_font_px};
use crate::style::config::Style;
use crate::style::geometry::Geometry;

/// Render the raster form of a styled QR code as a straight-alpha RGBA image.
///
/// Pass order: background fill, module fill, rounded-corner mask, overlay label. The label is
/// clipped by the same mask, so corner pixels stay fully transparent.
#[tracing::instrument(skip_all, fields(modules = geom.modules, canvas = geom.canvas, radius = geom.radius))]
pub(crate) fn render_raster(
    matrix: &ModuleMatrix,
    style: &Style,
    geom: &Geometry,
    face: &OverlayFace,
    min_font_px: u32,
) -> QrResult<RgbaImage> {
    if matrix.modules() != geom.modules {
        return Err(QrError::render(format!(
            "geometry is for {} modules, matrix has {}",
            geom.modules,
            matrix.modules()
        )));
    }

    let canvas = geom.canvas;
    let mut img = RgbaImage::from_pixel(canvas, canvas, Rgba(style.background().to_array()));

    let ink = Rgba(style.foreground().to_array());
    for (x, y) in matrix.dark_cells() {
        fill_rect(&mut img, geom.module_rect(x, y), ink);
    }

    let mask = (geom.radius > 0).then(|| rounded_mask(canvas, geom.radius));
    if let Some(mask) = &mask {
        apply_mask(&mut img, mask)?;
    }

    if let Some(text) = style.overlay_text() {
        let spec = OverlaySpec {
            text,
            color: style.overlay_color(),
            font_px: overlay_font_px(canvas, min_font_px),
            clip: mask.as_ref(),
        };
        draw_overlay(&mut img, face, &spec)?;
    }

    Ok(img)
}

/// Fill every pixel whose center lies in `[x0, x1) × [y0, y1)`.
///
/// Adjacent rects sharing an edge therefore never overlap and never leave a gap.
fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let span = |lo: f64, hi: f64, limit: u32| {
        let a = first_pixel_at_or_after(lo).clamp(0, i64::from(limit));
        let b = first_pixel_at_or_after(hi).clamp(0, i64::from(limit));
        (a as u32)..(b as u32)
    };
    let xs = span(rect.x0, rect.x1, w);
    for py in span(rect.y0, rect.y1, h) {
        for px in xs.clone() {
            img.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
