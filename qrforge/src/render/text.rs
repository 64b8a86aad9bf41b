use image::{GrayImage, RgbaImage};

use crate::assets::font::OverlayFace;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{QrError, QrResult};
use crate::render::bitmap_font;
use crate::render::composite::over_premul_layer;

/// Overlay font size in pixels: a sixth of the canvas, never below `min_font_px`.
pub(crate) fn overlay_font_px(canvas: u32, min_font_px: u32) -> u32 {
    (canvas / 6).max(min_font_px)
}

/// Inputs for drawing one centered overlay label.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OverlaySpec<'a> {
    pub(crate) text: &'a str,
    pub(crate) color: Rgba8,
    pub(crate) font_px: u32,
    pub(crate) clip: Option<&'a GrayImage>,
}

/// Draw `spec.text` centered on `img` with `face`.
///
/// Ink lands only where `spec.clip` is non-zero, so masked-out corners stay transparent.
#[tracing::instrument(skip(img, face, spec), fields(chars = spec.text.chars().count(), font_px = spec.font_px))]
pub(crate) fn draw_overlay(
    img: &mut RgbaImage,
    face: &OverlayFace,
    spec: &OverlaySpec<'_>,
) -> QrResult<()> {
    if spec.text.is_empty() {
        return Ok(());
    }
    match face {
        OverlayFace::Bitmap => {
            draw_bitmap(img, spec);
            Ok(())
        }
        OverlayFace::Outline(bytes) => draw_outline(img, bytes, spec),
    }
}

/// Integer scale applied to the 5×7 face for a given font size.
pub(crate) fn bitmap_scale(font_px: u32) -> u32 {
    let scale = (f64::from(font_px) / f64::from(bitmap_font::GLYPH_H)).round() as u32;
    scale.max(1)
}

fn draw_bitmap(img: &mut RgbaImage, spec: &OverlaySpec<'_>) {
    let (w, h) = img.dimensions();
    let scale = i64::from(bitmap_scale(spec.font_px));
    let (units_w, units_h) = bitmap_font::text_extent(spec.text);
    let ox = (i64::from(w) - i64::from(units_w) * scale) / 2;
    let oy = (i64::from(h) - i64::from(units_h) * scale) / 2;
    let advance = i64::from(bitmap_font::ADVANCE) * scale;
    let ink = spec.color.to_array();

    let mut cell_x = ox;
    for c in spec.text.chars() {
        if cell_x >= i64::from(w) {
            break;
        }
        if cell_x + advance <= 0 {
            cell_x += advance;
            continue;
        }
        for row in 0..bitmap_font::GLYPH_H {
            for col in 0..bitmap_font::GLYPH_W {
                if !bitmap_font::is_set(c, col, row) {
                    continue;
                }
                let x0 = cell_x + i64::from(col) * scale;
                let y0 = oy + i64::from(row) * scale;
                for py in y0.max(0)..(y0 + scale).min(i64::from(h)) {
                    for px in x0.max(0)..(x0 + scale).min(i64::from(w)) {
                        let (Ok(px), Ok(py)) = (u32::try_from(px), u32::try_from(py)) else {
                            continue;
                        };
                        if px >= w || py >= h {
                            continue;
                        }
                        if let Some(clip) = spec.clip
                            && clip.get_pixel(px, py).0[0] == 0
                        {
                            continue;
                        }
                        img.put_pixel(px, py, image::Rgba(ink));
                    }
                }
            }
        }
        cell_x += advance;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LabelBrush {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Rgba8> for LabelBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Parley contexts for shaping one label from raw font bytes.
struct LabelLayout {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
}

impl LabelLayout {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn shape(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: LabelBrush,
    ) -> QrResult<parley::Layout<LabelBrush>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| QrError::render("overlay font registered no families"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| QrError::render("overlay font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<LabelBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn draw_outline(img: &mut RgbaImage, font_bytes: &[u8], spec: &OverlaySpec<'_>) -> QrResult<()> {
    let (w, h) = img.dimensions();
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        return Err(QrError::render(format!(
            "canvas {w}x{h} is too large for outline text"
        )));
    };

    let layout = LabelLayout::new().shape(
        spec.text,
        font_bytes,
        spec.font_px as f32,
        spec.color.into(),
    )?;
    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
        0,
    );

    let dx = ((f64::from(w) - f64::from(layout.width())) / 2.0).round();
    let dy = ((f64::from(h) - f64::from(layout.height())) / 2.0).round();

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((dx, dy)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    over_premul_layer(img, pixmap.data_as_u8_slice(), spec.clip)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
