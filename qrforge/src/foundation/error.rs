use std::path::PathBuf;

/// Convenience result type used across qrforge.
pub type QrResult<T> = Result<T, QrError>;

/// Which style slot a color string was supplied for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorRole {
    /// Module (dark cell) color. Must be concrete.
    Foreground,
    /// Canvas color. May be `"transparent"`.
    Background,
}

impl std::fmt::Display for ColorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Foreground => f.write_str("foreground"),
            Self::Background => f.write_str("background"),
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
///
/// `InvalidColor` and `Validation` are raised before any rendering or I/O happens. `Render` marks
/// a broken internal contract. `Storage` carries the path that failed so callers can decide
/// between retry and abort.
#[derive(thiserror::Error, Debug)]
pub enum QrError {
    /// A color string that is not `#RRGGBB` (or `transparent`, for backgrounds).
    #[error("validation error: invalid {role} color \"{value}\": {reason}")]
    InvalidColor {
        /// Slot the color was supplied for.
        role: ColorRole,
        /// The rejected input, verbatim.
        value: String,
        /// Short human-readable cause.
        reason: &'static str,
    },

    /// Invalid user-provided style or matrix data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal invariant violated while producing an image.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem failure while persisting assets.
    #[error("storage error at '{}': {source}", path.display())]
    Storage {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QrError {
    /// Build a [`QrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`QrError::Storage`] value.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_color(role: ColorRole, value: &str, reason: &'static str) -> Self {
        Self::InvalidColor {
            role,
            value: value.to_owned(),
            reason,
        }
    }

    /// Return `true` for errors caused by caller input rather than the engine or the filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidColor { .. } | Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
