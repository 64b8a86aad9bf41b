use crate::foundation::core::{ModuleMatrix, Rect};
use crate::style::config::Style;

/// Pixel geometry shared by the vector and raster renderers.
///
/// Both outputs place module `(x, y)` at [`Geometry::module_rect`]; nothing else computes cell
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Matrix dimension in modules.
    pub modules: usize,
    /// Side length of one module in pixels (`size / modules`).
    pub module_size: f64,
    /// Margin in pixels.
    pub padding: u32,
    /// Full image side length (`size + 2 * padding`).
    pub canvas: u32,
    /// Corner radius clamped to `canvas / 2`.
    pub radius: u32,
}

impl Geometry {
    /// Resolve geometry for `matrix` drawn with `style`.
    pub fn resolve(matrix: &ModuleMatrix, style: &Style) -> Self {
        Self::from_parts(
            matrix.modules(),
            style.size(),
            style.padding(),
            style.border_radius(),
        )
    }

    pub(crate) fn from_parts(modules: usize, size: u32, padding: u32, border_radius: u32) -> Self {
        let canvas = size + 2 * padding;
        Self {
            modules,
            module_size: f64::from(size) / modules as f64,
            padding,
            canvas,
            radius: border_radius.min(canvas / 2),
        }
    }

    /// Pixel rectangle covered by module column `x`, row `y`.
    pub fn module_rect(&self, x: usize, y: usize) -> Rect {
        let pad = f64::from(self.padding);
        let x0 = pad + x as f64 * self.module_size;
        let y0 = pad + y as f64 * self.module_size;
        Rect::new(x0, y0, x0 + self.module_size, y0 + self.module_size)
    }

    /// Full canvas rectangle.
    pub fn canvas_rect(&self) -> Rect {
        let c = f64::from(self.canvas);
        Rect::new(0.0, 0.0, c, c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/geometry.rs"]
mod tests;
