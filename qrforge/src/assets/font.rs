use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{QrError, QrResult};

/// Where overlay text glyphs come from.
///
/// Implementations return raw TrueType/OpenType bytes, or `None` to select the embedded 5×7
/// bitmap face. A [`crate::Renderer`] asks once, at construction.
pub trait FontSource: Send + Sync + std::fmt::Debug {
    /// Load font bytes for overlay text.
    fn load(&self) -> QrResult<Option<Arc<Vec<u8>>>>;
}

/// Always the embedded bitmap face. Output never depends on host fonts.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedFont;

impl FontSource for EmbeddedFont {
    fn load(&self) -> QrResult<Option<Arc<Vec<u8>>>> {
        Ok(None)
    }
}

/// Font bytes read eagerly from one file.
#[derive(Clone, Debug)]
pub struct FontFile {
    path: PathBuf,
    bytes: Arc<Vec<u8>>,
}

impl FontFile {
    /// Read a font file from disk.
    pub fn open(path: impl AsRef<Path>) -> QrResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes: Arc::new(bytes),
        })
    }

    /// Wrap font bytes that are already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            path: PathBuf::new(),
            bytes: Arc::new(bytes),
        }
    }

    /// Source path; empty for in-memory fonts.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FontSource for FontFile {
    fn load(&self) -> QrResult<Option<Arc<Vec<u8>>>> {
        Ok(Some(Arc::clone(&self.bytes)))
    }
}

/// First readable font among candidate paths, else the embedded face.
#[derive(Clone, Debug)]
pub struct FontSearch {
    candidates: Vec<PathBuf>,
}

impl FontSearch {
    /// Search the given paths in order.
    pub fn new(candidates: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Common bold sans-serif locations on Linux, macOS and Windows.
    pub fn system_defaults() -> Self {
        Self::new([
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
            "/Library/Fonts/Arial Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            "C:\\Windows\\Fonts\\arialbd.ttf",
        ])
    }

    /// Paths searched, in order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl FontSource for FontSearch {
    fn load(&self) -> QrResult<Option<Arc<Vec<u8>>>> {
        for path in &self.candidates {
            if !path.is_file() {
                continue;
            }
            match std::fs::read(path) {
                Ok(bytes) => {
                    tracing::debug!(path = %path.display(), "overlay font found");
                    return Ok(Some(Arc::new(bytes)));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
                }
            }
        }
        tracing::debug!("no overlay font found, using embedded bitmap face");
        Ok(None)
    }
}

/// Resolved overlay face held by a renderer.
#[derive(Clone, Debug)]
pub(crate) enum OverlayFace {
    Bitmap,
    Outline(Arc<Vec<u8>>),
}

impl OverlayFace {
    /// Load from `source`, checking that outline bytes register at least one font family.
    pub(crate) fn load(source: &dyn FontSource) -> QrResult<Self> {
        let Some(bytes) = source.load()? else {
            return Ok(Self::Bitmap);
        };
        let mut collection =
            parley::fontique::Collection::new(parley::fontique::CollectionOptions {
                shared: false,
                system_fonts: false,
            });
        let families =
            collection.register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        if families.is_empty() {
            return Err(QrError::render(
                "overlay font bytes contain no usable font face",
            ));
        }
        Ok(Self::Outline(bytes))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
