use image::{GrayImage, RgbaImage};

use crate::foundation::error::{QrError, QrResult};
use crate::foundation::math::{mul_div255_u16, mul_div255_u8};

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(u16::from(sa), mul_div255_u16(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(u16::from(src[i]), mul_div255_u16(u16::from(dst[i]), inv));
    }
    out
}

pub(crate) fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

pub(crate) fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Scale every pixel's alpha by the mask. Pixels that end fully transparent become `[0, 0, 0, 0]`.
pub(crate) fn apply_mask(img: &mut RgbaImage, mask: &GrayImage) -> QrResult<()> {
    if img.dimensions() != mask.dimensions() {
        return Err(QrError::render(format!(
            "mask is {:?} but image is {:?}",
            mask.dimensions(),
            img.dimensions()
        )));
    }
    for (px, m) in img.pixels_mut().zip(mask.pixels()) {
        let a = mul_div255_u8(u16::from(px.0[3]), u16::from(m.0[0]));
        px.0 = if a == 0 { [0, 0, 0, 0] } else { [px.0[0], px.0[1], px.0[2], a] };
    }
    Ok(())
}

/// Composite a premultiplied RGBA8 layer over a straight-alpha image.
///
/// Pixels where `clip` is zero are left untouched.
pub(crate) fn over_premul_layer(
    dst: &mut RgbaImage,
    layer: &[u8],
    clip: Option<&GrayImage>,
) -> QrResult<()> {
    let (w, h) = dst.dimensions();
    if layer.len() != (w as usize) * (h as usize) * 4 {
        return Err(QrError::render(
            "overlay layer must match the canvas size",
        ));
    }
    if let Some(clip) = clip
        && clip.dimensions() != (w, h)
    {
        return Err(QrError::render("clip mask must match the canvas size"));
    }

    for (i, (px, src)) in dst.pixels_mut().zip(layer.chunks_exact(4)).enumerate() {
        if src[3] == 0 {
            continue;
        }
        if let Some(clip) = clip
            && clip.as_raw()[i] == 0
        {
            continue;
        }
        let blended = over(premultiply(px.0), [src[0], src[1], src[2], src[3]]);
        px.0 = unpremultiply(blended);
    }
    Ok(())
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
