//! qrforge turns a QR module matrix into styled SVG and PNG assets.
//!
//! Symbol encoding is out of scope: callers bring a square boolean grid from any QR encoder.
//! The engine then:
//!
//! - Validates a [`StyleConfig`] into a [`Style`] (colors, size, padding, corner radius, label)
//! - Renders both forms through one [`Geometry`] with a [`Renderer`]
//! - Persists the pair with an [`AssetWriter`] or returns it as [`PreviewAssets`]
//!
//! Output is deterministic: identical inputs produce identical SVG text and PNG bytes.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod style;

/// Rendering pipeline and vector/raster checks.
pub mod render;

pub use crate::assets::font::{EmbeddedFont, FontFile, FontSearch, FontSource};
pub use crate::assets::writer::{AssetDirs, AssetWriter, PNG_DIR_ENV, SVG_DIR_ENV, StoredAssets};
pub use crate::encode::preview::PreviewAssets;
pub use crate::foundation::core::{ModuleMatrix, Point, Rect, Rgba8};
pub use crate::foundation::error::{ColorRole, QrError, QrResult};
pub use crate::render::pipeline::{RenderOpts, RenderedAssets, Renderer};
pub use crate::render::svg_raster::{ParityReport, module_parity, rasterize_svg};
pub use crate::style::color::{TRANSPARENT, resolve_background, resolve_color, resolve_foreground};
pub use crate::style::config::{Style, StyleConfig, StyleLimits};
pub use crate::style::geometry::Geometry;
