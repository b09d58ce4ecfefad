//! Loading inputs and committing outputs.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{PosterkitError, Result};

/// Fail with [`PosterkitError::InputNotFound`] unless `path` exists.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PosterkitError::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Open and decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    ensure_exists(path)?;

    let image = image::open(path)?;
    info!(
        "Opened {}: {} x {} px, {:?}",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// Derive an output path next to `input`: `<dir>/<stem><suffix>`.
///
/// `suffix` includes the extension, e.g. `"_poster.pdf"`.
pub fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}", stem, suffix))
}

/// Mode for new output files. Replaced files keep their own mode.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Write `bytes` to `path` so that readers never see a partial file.
///
/// The data goes to a uniquely named temporary file in the destination
/// directory first and is renamed over `path` once complete. The result is
/// readable like a normally created file rather than owner-only.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut file = NamedTempFile::new_in(&dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    #[cfg(unix)]
    file.as_file().set_permissions(output_permissions(path))?;
    file.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(unix)]
fn output_permissions(path: &Path) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta.permissions(),
        _ => std::fs::Permissions::from_mode(OUTPUT_MODE),
    }
}

/// Encode an image as PNG and write it atomically.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)?;
    write_atomically(path, &buf)
}
