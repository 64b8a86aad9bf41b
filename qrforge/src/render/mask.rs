use image::{GrayImage, Luma};

use crate::foundation::core::Point;

/// Binary rounded-rectangle mask for a `canvas × canvas` image.
///
/// A pixel is 255 when its whole square lies inside the rounded rectangle `[0, canvas]²` with
/// corner radius `radius`, and 0 otherwise. With `radius > 0` the four corner pixels are always 0.
pub(crate) fn rounded_mask(canvas: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::from_pixel(canvas, canvas, Luma([255]));
    if radius == 0 || canvas == 0 {
        return mask;
    }

    let shape = RoundedSquare {
        side: f64::from(canvas),
        radius: f64::from(radius),
    };
    // Only pixels inside the four radius × radius corner boxes can fall outside the shape.
    let r = radius.min(canvas);
    let in_corner_band = |v: u32| v < r || v >= canvas - r;
    for py in (0..canvas).filter(|&v| in_corner_band(v)) {
        for px in (0..canvas).filter(|&v| in_corner_band(v)) {
            if !shape.covers_pixel(px, py) {
                mask.put_pixel(px, py, Luma([0]));
            }
        }
    }
    mask
}

#[derive(Clone, Copy, Debug)]
struct RoundedSquare {
    side: f64,
    radius: f64,
}

impl RoundedSquare {
    const EPS: f64 = 1e-9;

    /// Closed-set containment.
    fn contains(&self, p: Point) -> bool {
        let lo = self.radius;
        let hi = self.side - self.radius;
        let cx = p.x.clamp(lo, hi.max(lo));
        let cy = p.y.clamp(lo, hi.max(lo));
        let d = p - Point::new(cx, cy);
        d.hypot2() <= self.radius * self.radius + Self::EPS
    }

    /// The shape is convex, so a pixel square is covered when all four of its corners are.
    fn covers_pixel(&self, px: u32, py: u32) -> bool {
        let x0 = f64::from(px);
        let y0 = f64::from(py);
        [
            Point::new(x0, y0),
            Point::new(x0 + 1.0, y0),
            Point::new(x0, y0 + 1.0),
            Point::new(x0 + 1.0, y0 + 1.0),
        ]
        .into_iter()
        .all(|p| self.contains(p))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
