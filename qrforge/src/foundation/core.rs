use crate::foundation::error::{QrError, QrResult};

pub use kurbo::{Point, Rect};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black, the resolved value of `"transparent"`.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Build a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Return `true` when the alpha channel is zero.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Canonical `#rrggbb` spelling (alpha is not represented).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Square grid of QR modules as produced by an external encoder.
///
/// Cells are stored row-major; `true` is a dark module. The grid is immutable once built and is
/// only checked for being square and non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleMatrix {
    modules: usize,
    cells: Vec<bool>,
}

impl ModuleMatrix {
    /// Build a matrix from rows, rejecting empty or non-square input.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> QrResult<Self> {
        let modules = rows.len();
        if modules == 0 {
            return Err(QrError::validation("module matrix must be non-empty"));
        }

        let len = modules
            .checked_mul(modules)
            .ok_or_else(|| QrError::validation("module matrix dimension overflows"))?;
        let mut cells = Vec::with_capacity(len);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != modules {
                return Err(QrError::validation(format!(
                    "module matrix must be square: row {y} has {} cells, expected {modules}",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }

        Ok(Self { modules, cells })
    }

    /// Build a matrix from a row-major cell vector of length `modules * modules`.
    pub fn from_flat(modules: usize, cells: Vec<bool>) -> QrResult<Self> {
        if modules == 0 {
            return Err(QrError::validation("module matrix must be non-empty"));
        }
        let expected = modules
            .checked_mul(modules)
            .ok_or_else(|| QrError::validation("module matrix dimension overflows"))?;
        if cells.len() != expected {
            return Err(QrError::validation(format!(
                "module matrix must be square: got {} cells for dimension {modules}",
                cells.len()
            )));
        }
        Ok(Self { modules, cells })
    }

    /// Build a matrix by evaluating `f(x, y)` for every cell.
    pub fn from_fn(modules: usize, mut f: impl FnMut(usize, usize) -> bool) -> QrResult<Self> {
        if modules == 0 {
            return Err(QrError::validation("module matrix must be non-empty"));
        }
        let len = modules
            .checked_mul(modules)
            .ok_or_else(|| QrError::validation("module matrix dimension overflows"))?;
        let mut cells = Vec::with_capacity(len);
        for y in 0..modules {
            for x in 0..modules {
                cells.push(f(x, y));
            }
        }
        Ok(Self { modules, cells })
    }

    /// Width and height in modules.
    pub fn modules(&self) -> usize {
        self.modules
    }

    /// Return the module at column `x`, row `y`. Out-of-range coordinates read as light.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.modules || y >= self.modules {
            return false;
        }
        self.cells[y * self.modules + x]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Dark module coordinates `(x, y)` in row-major order.
    pub fn dark_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.modules;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| (i % n, i / n))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
