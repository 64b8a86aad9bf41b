//! Rendering: the SVG and raster outputs, their shared compositing helpers and the
//! [`pipeline::Renderer`] façade.

pub(crate) mod bitmap_font;
pub(crate) mod composite;
pub(crate) mod mask;
/// Renderer façade, options and rendered output.
pub mod pipeline;
pub(crate) mod raster;
pub(crate) mod svg;
/// SVG rasterization and vector/raster module parity.
pub mod svg_raster;
pub(crate) mod text;
