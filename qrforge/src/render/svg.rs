use std::fmt::Write as _;

use crate::foundation::core::ModuleMatrix;
use crate::foundation::error::{QrError, QrResult};
use crate::style::config::Style;
use crate::style::geometry::Geometry;

/// Render the vector form of a styled QR code.
///
/// The document holds an optional background rect followed by one rect per dark module, in
/// row-major order. Coordinates are written with 3 decimals and colors in canonical `#rrggbb`
/// form, so identical input always yields identical bytes.
pub fn render_svg(matrix: &ModuleMatrix, style: &Style, geom: &Geometry) -> QrResult<String> {
    if matrix.modules() != geom.modules {
        return Err(QrError::render(format!(
            "geometry is for {} modules, matrix has {}",
            geom.modules,
            matrix.modules()
        )));
    }
    let canvas = geom.canvas;
    // Background plus ~80 bytes per module rect.
    let mut out = String::with_capacity(256 + matrix.dark_count() * 80);

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas}" height="{canvas}" viewBox="0 0 {canvas} {canvas}">"#
    );

    let bg = style.background();
    if !bg.is_transparent() {
        let r = geom.radius;
        let _ = writeln!(
            out,
            r#"<rect width="{canvas}" height="{canvas}" fill="{}" rx="{r}" ry="{r}" />"#,
            bg.to_hex()
        );
    }

    let fg = style.foreground().to_hex();
    let side = geom.module_size;
    for (x, y) in matrix.dark_cells() {
        let rect = geom.module_rect(x, y);
        let _ = writeln!(
            out,
            r#"<rect x="{:.3}" y="{:.3}" width="{side:.3}" height="{side:.3}" fill="{fg}" />"#,
            rect.x0, rect.y0,
        );
    }

    out.push_str("</svg>\n");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
