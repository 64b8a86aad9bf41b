use crate::foundation::core::Rgba8;
use crate::foundation::error::{ColorRole, QrError, QrResult};

/// Sentinel accepted for backgrounds only.
pub const TRANSPARENT: &str = "transparent";

/// Resolve a color string for the given slot.
///
/// Accepts `#RRGGBB` in any letter case. Backgrounds additionally accept `transparent`, which
/// resolves to [`Rgba8::TRANSPARENT`]. Concrete colors are always opaque.
pub fn resolve_color(input: &str, role: ColorRole) -> QrResult<Rgba8> {
    if input.eq_ignore_ascii_case(TRANSPARENT) {
        return match role {
            ColorRole::Background => Ok(Rgba8::TRANSPARENT),
            ColorRole::Foreground => Err(QrError::invalid_color(
                role,
                input,
                "foreground must be a concrete #RRGGBB color",
            )),
        };
    }

    let Some(digits) = input.strip_prefix('#') else {
        return Err(QrError::invalid_color(
            role,
            input,
            "expected #RRGGBB or \"transparent\"",
        ));
    };
    if digits.len() != 6 {
        return Err(QrError::invalid_color(
            role,
            input,
            "expected exactly 6 hex digits",
        ));
    }
    // from_str_radix tolerates a leading '+', so check digits explicitly.
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QrError::invalid_color(role, input, "non-hex character"));
    }

    let byte = |i: usize| -> QrResult<u8> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| QrError::invalid_color(role, input, "non-hex character"))
    };
    Ok(Rgba8::opaque(byte(0)?, byte(2)?, byte(4)?))
}

/// Resolve a foreground color. `transparent` is rejected.
pub fn resolve_foreground(input: &str) -> QrResult<Rgba8> {
    resolve_color(input, ColorRole::Foreground)
}

/// Resolve a background color. `transparent` is accepted.
pub fn resolve_background(input: &str) -> QrResult<Rgba8> {
    resolve_color(input, ColorRole::Background)
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
