use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::foundation::error::{QrError, QrResult};
use crate::render::pipeline::RenderedAssets;

/// Environment variable naming the SVG output directory.
pub const SVG_DIR_ENV: &str = "QR_FORGE_SVG_DIR";
/// Environment variable naming the PNG output directory.
pub const PNG_DIR_ENV: &str = "QR_FORGE_PNG_DIR";

const DEFAULT_SVG_DIR: &str = "generated_svgs";
const DEFAULT_PNG_DIR: &str = "generated_pngs";

/// Output directories for persisted assets. The two may be the same directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDirs {
    /// Directory receiving `<id>.svg`.
    pub svg_dir: PathBuf,
    /// Directory receiving `<id>.png`.
    pub png_dir: PathBuf,
}

impl Default for AssetDirs {
    fn default() -> Self {
        Self::new(DEFAULT_SVG_DIR, DEFAULT_PNG_DIR)
    }
}

impl AssetDirs {
    /// Use explicit directories.
    pub fn new(svg_dir: impl Into<PathBuf>, png_dir: impl Into<PathBuf>) -> Self {
        Self {
            svg_dir: svg_dir.into(),
            png_dir: png_dir.into(),
        }
    }

    /// Default subdirectory names under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join(DEFAULT_SVG_DIR), root.join(DEFAULT_PNG_DIR))
    }

    /// Read [`SVG_DIR_ENV`] and [`PNG_DIR_ENV`], falling back to the default names.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            svg_dir: pick(SVG_DIR_ENV, DEFAULT_SVG_DIR),
            png_dir: pick(PNG_DIR_ENV, DEFAULT_PNG_DIR),
        }
    }
}

/// Where one persisted pair landed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAssets {
    /// Identifier shared by both file names.
    pub id: Uuid,
    /// `<svg_dir>/<id>.svg`.
    pub svg_path: PathBuf,
    /// `<png_dir>/<id>.png`.
    pub png_path: PathBuf,
}

/// Persists rendered pairs under fresh UUID v4 names.
///
/// Existing files are never overwritten. Each file is staged under a hidden temporary name
/// opened with `create_new`, then published with a no-clobber link. If any step fails,
/// everything written for that id is removed again.
#[derive(Clone, Debug, Default)]
pub struct AssetWriter {
    dirs: AssetDirs,
}

impl AssetWriter {
    /// Writer targeting `dirs`. Directories are created on first write.
    pub fn new(dirs: AssetDirs) -> Self {
        Self { dirs }
    }

    /// Target directories.
    pub fn dirs(&self) -> &AssetDirs {
        &self.dirs
    }

    /// Persist `assets` under a new random id.
    pub fn write(&self, assets: &RenderedAssets) -> QrResult<StoredAssets> {
        self.write_with_id(Uuid::new_v4(), assets)
    }

    #[tracing::instrument(skip(self, assets), fields(svg_bytes = assets.svg_text.len(), png_bytes = assets.png_bytes.len()))]
    pub(crate) fn write_with_id(&self, id: Uuid, assets: &RenderedAssets) -> QrResult<StoredAssets> {
        for dir in [&self.dirs.svg_dir, &self.dirs.png_dir] {
            fs::create_dir_all(dir).map_err(|e| QrError::storage(dir, e))?;
        }

        let svg_path = self.dirs.svg_dir.join(format!("{id}.svg"));
        let png_path = self.dirs.png_dir.join(format!("{id}.png"));

        let mut guard = Rollback::default();
        let svg_tmp = stage(&mut guard, &self.dirs.svg_dir, id, "svg", assets.svg_text.as_bytes())?;
        let png_tmp = stage(&mut guard, &self.dirs.png_dir, id, "png", &assets.png_bytes)?;
        publish(&mut guard, &svg_tmp, &svg_path)?;
        publish(&mut guard, &png_tmp, &png_path)?;
        guard.commit();

        tracing::debug!(%id, svg = %svg_path.display(), png = %png_path.display(), "assets written");
        Ok(StoredAssets {
            id,
            svg_path,
            png_path,
        })
    }

    /// Delete both files of a stored pair. Files that are already gone are not an error.
    pub fn remove(&self, stored: &StoredAssets) -> QrResult<()> {
        for path in [&stored.svg_path, &stored.png_path] {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(QrError::storage(path, e)),
            }
        }
        tracing::debug!(id = %stored.id, "assets removed");
        Ok(())
    }
}

fn stage(guard: &mut Rollback, dir: &Path, id: Uuid, ext: &str, bytes: &[u8]) -> QrResult<PathBuf> {
    let tmp = dir.join(format!(".{id}.{ext}.partial"));
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .map_err(|e| QrError::storage(&tmp, e))?;
    guard.staged.push(tmp.clone());
    f.write_all(bytes).map_err(|e| QrError::storage(&tmp, e))?;
    f.sync_all().map_err(|e| QrError::storage(&tmp, e))?;
    Ok(tmp)
}

/// Move `tmp` to `dest`, failing if `dest` already exists.
fn publish(guard: &mut Rollback, tmp: &Path, dest: &Path) -> QrResult<()> {
    match fs::hard_link(tmp, dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(QrError::storage(dest, e));
        }
        Err(_) => {
            // No hard links on this filesystem.
            if dest.try_exists().map_err(|e| QrError::storage(dest, e))? {
                return Err(QrError::storage(
                    dest,
                    io::Error::from(io::ErrorKind::AlreadyExists),
                ));
            }
            fs::rename(tmp, dest).map_err(|e| QrError::storage(dest, e))?;
        }
    }
    guard.published.push(dest.to_path_buf());
    Ok(())
}

/// Removes staged files always, and published files unless committed.
#[derive(Default)]
struct Rollback {
    staged: Vec<PathBuf>,
    published: Vec<PathBuf>,
}

impl Rollback {
    fn commit(&mut self) {
        self.published.clear();
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        for path in self.staged.drain(..).chain(self.published.drain(..)) {
            let _ = fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/writer.rs"]
mod tests;
