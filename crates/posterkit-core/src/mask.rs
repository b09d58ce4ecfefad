//! Applying a hand-edited grayscale mask as an image's alpha channel.

use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage, RgbaImage};
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::files;

/// Replace the alpha channel of `image` with the luma of `mask`.
pub fn apply_mask(image: &DynamicImage, mask: &DynamicImage) -> Result<RgbaImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(ProcessingError::MaskSizeMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        }
        .into());
    }

    let mut rgba = image.to_rgba8();
    put_alpha(&mut rgba, &mask.to_luma8());
    Ok(rgba)
}

/// Copy `alpha` into the alpha channel of `image`. Sizes must match.
pub(crate) fn put_alpha(image: &mut RgbaImage, alpha: &GrayImage) {
    for (pixel, a) in image.pixels_mut().zip(alpha.pixels()) {
        pixel[3] = a[0];
    }
}

/// Load `image_path` and `mask_path`, apply the mask and save a PNG.
pub fn apply_mask_files(image_path: &Path, mask_path: &Path, output: &Path) -> Result<()> {
    files::ensure_exists(image_path)?;
    files::ensure_exists(mask_path)?;

    let image = files::load_image(image_path)?;
    let mask = files::load_image(mask_path)?;

    let masked = apply_mask(&image, &mask)?;
    files::save_png(&DynamicImage::ImageRgba8(masked), output)?;

    info!("Mask applied and saved as: {}", output.display());
    Ok(())
}

/// Default output path: `<stem>_masked.png`.
pub fn default_output_path(input: &Path) -> std::path::PathBuf {
    files::sibling_path(input, "_masked.png")
}
