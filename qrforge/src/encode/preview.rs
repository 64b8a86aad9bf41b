use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{QrError, QrResult};
use crate::render::pipeline::RenderedAssets;

/// In-memory form of a rendered pair, as returned to preview clients.
///
/// `svg_data` is the SVG text unchanged and `png_data` is the PNG encoded as standard base64 with
/// padding. Decoding `png_data` yields exactly the bytes an [`crate::AssetWriter`] would persist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewAssets {
    /// SVG document text.
    pub svg_data: String,
    /// Base64 (standard alphabet, padded) PNG bytes.
    pub png_data: String,
}

impl PreviewAssets {
    /// Encode a rendered pair for preview.
    pub fn encode(assets: &RenderedAssets) -> Self {
        Self {
            svg_data: assets.svg_text.clone(),
            png_data: STANDARD.encode(&assets.png_bytes),
        }
    }

    /// Decode `png_data` back to raw PNG bytes.
    pub fn png_bytes(&self) -> QrResult<Vec<u8>> {
        STANDARD
            .decode(&self.png_data)
            .map_err(|e| QrError::validation(format!("png_data is not valid base64: {e}")))
    }
}

impl From<&RenderedAssets> for PreviewAssets {
    fn from(assets: &RenderedAssets) -> Self {
        Self::encode(assets)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/preview.rs"]
mod tests;
