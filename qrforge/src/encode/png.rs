use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder as _, RgbaImage};

use crate::foundation::error::{QrError, QrResult};

/// Encode a straight-alpha RGBA image as an 8-bit RGBA PNG.
///
/// Encoder settings are fixed, so identical pixels always produce identical bytes.
pub(crate) fn encode_png(img: &RgbaImage) -> QrResult<Vec<u8>> {
    let mut out = Vec::with_capacity(img.as_raw().len() / 4);
    PngEncoder::new(&mut out)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| QrError::render(format!("png encode: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
