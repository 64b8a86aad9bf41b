use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{QrError, QrResult};
use crate::style::color::{resolve_background, resolve_foreground};

/// Largest accepted canvas side, whatever the configured limits allow.
pub(crate) const MAX_CANVAS: u32 = 16_384;

/// JSON-facing style request.
///
/// Numbers are signed so that out-of-range input (for example `padding: -1`) reaches
/// [`StyleConfig::validate`] and is rejected there instead of failing somewhere in parsing.
/// Field aliases accept the `*_color` spelling used by HTTP payloads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// `#RRGGBB` module color.
    #[serde(alias = "foreground_color")]
    pub foreground: String,
    /// `#RRGGBB` canvas color or `transparent`.
    #[serde(alias = "background_color")]
    pub background: String,
    /// Side length of the module area in pixels.
    pub size: i64,
    /// Quiet margin around the module area in pixels.
    pub padding: i64,
    /// Requested canvas corner radius in pixels.
    pub border_radius: i64,
    /// Short label drawn centered on the raster output.
    pub overlay_text: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            foreground: "#000000".to_owned(),
            background: "#FFFFFF".to_owned(),
            size: 512,
            padding: 16,
            border_radius: 0,
            overlay_text: None,
        }
    }
}

impl StyleConfig {
    /// Parse a style from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> QrResult<Self> {
        let cfg: Self = serde_json::from_reader(r).context("parse style JSON")?;
        Ok(cfg)
    }

    /// Parse a style from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> QrResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open style JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every field against `limits` and resolve colors.
    ///
    /// Colors are checked first, then numbers, then overlay text. Nothing is rendered or written
    /// before this returns `Ok`.
    pub fn validate(&self, limits: &StyleLimits) -> QrResult<Style> {
        let foreground = resolve_foreground(&self.foreground)?;
        let background = resolve_background(&self.background)?;

        let size = check_range("size", self.size, limits.size_min, limits.size_max)?;
        let padding = check_range("padding", self.padding, 0, limits.padding_max)?;
        let border_radius =
            check_range("border_radius", self.border_radius, 0, limits.border_radius_max)?;
        let canvas = u64::from(size) + 2 * u64::from(padding);
        if canvas > u64::from(MAX_CANVAS) {
            return Err(QrError::validation(format!(
                "canvas {canvas}px exceeds the {MAX_CANVAS}px maximum"
            )));
        }

        let overlay_text = match self.overlay_text.as_deref() {
            None => None,
            Some(raw) => {
                let text = raw.trim();
                if text.is_empty() {
                    return Err(QrError::validation("overlay_text must not be empty"));
                }
                let chars = text.chars().count();
                if chars > limits.overlay_max_chars {
                    return Err(QrError::validation(format!(
                        "overlay_text must be at most {} characters, got {chars}",
                        limits.overlay_max_chars
                    )));
                }
                Some(text.to_owned())
            }
        };

        Ok(Style {
            foreground,
            background,
            size,
            padding,
            border_radius,
            overlay_text,
        })
    }
}

fn check_range(name: &str, value: i64, min: u32, max: u32) -> QrResult<u32> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(QrError::validation(format!(
            "{name} must be within {min}..={max}, got {value}"
        )));
    }
    // In range of a u32 by the check above.
    Ok(value as u32)
}

/// Numeric bounds applied by [`StyleConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleLimits {
    pub(crate) size_min: u32,
    pub(crate) size_max: u32,
    pub(crate) padding_max: u32,
    pub(crate) border_radius_max: u32,
    pub(crate) overlay_max_chars: usize,
}

impl Default for StyleLimits {
    fn default() -> Self {
        Self {
            size_min: 64,
            size_max: 1024,
            padding_max: 128,
            border_radius_max: 120,
            overlay_max_chars: 4,
        }
    }
}

impl StyleLimits {
    /// Return limits with a different inclusive `size` range.
    pub fn with_size_range(mut self, min: u32, max: u32) -> Self {
        self.size_min = min.max(1);
        self.size_max = max.max(self.size_min);
        self
    }

    /// Return limits with a different maximum padding.
    pub fn with_padding_max(mut self, max: u32) -> Self {
        self.padding_max = max;
        self
    }

    /// Return limits with a different maximum requested corner radius.
    pub fn with_border_radius_max(mut self, max: u32) -> Self {
        self.border_radius_max = max;
        self
    }

    /// Return limits with a different overlay text length (in characters).
    pub fn with_overlay_max_chars(mut self, max: usize) -> Self {
        self.overlay_max_chars = max;
        self
    }
}

/// A validated style. Only [`StyleConfig::validate`] builds one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Style {
    foreground: Rgba8,
    background: Rgba8,
    size: u32,
    padding: u32,
    border_radius: u32,
    overlay_text: Option<String>,
}

impl Style {
    /// Opaque module color.
    pub fn foreground(&self) -> Rgba8 {
        self.foreground
    }

    /// Canvas color; alpha 0 when transparent.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Module area side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Margin in pixels.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Requested corner radius, before clamping to the canvas.
    pub fn border_radius(&self) -> u32 {
        self.border_radius
    }

    /// Trimmed, non-empty overlay label.
    pub fn overlay_text(&self) -> Option<&str> {
        self.overlay_text.as_deref()
    }

    pub(crate) fn without_overlay(mut self) -> Self {
        self.overlay_text = None;
        self
    }

    /// Overlay label color: black on an all-white foreground, otherwise the foreground.
    pub fn overlay_color(&self) -> Rgba8 {
        if self.foreground == Rgba8::WHITE {
            Rgba8::BLACK
        } else {
            self.foreground
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/config.rs"]
mod tests;
