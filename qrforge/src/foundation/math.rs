pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Index of the first pixel whose center `p + 0.5` is at or after `v`.
pub(crate) fn first_pixel_at_or_after(v: f64) -> i64 {
    (v - 0.5).ceil() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
