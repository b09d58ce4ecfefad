//! Preparing raster data for embedding: PDF image XObjects carry no alpha here.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use tracing::trace;

use crate::error::Result;

/// Composite an image over opaque white and drop the alpha channel.
///
/// Images without alpha are converted to RGB unchanged.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = src[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([blend(src[0]), blend(src[1]), blend(src[2])]);
    }
    out
}

/// Encode an RGB image as baseline JPEG into an in-memory buffer.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(image)?;
    trace!(
        "Encoded {}x{} JPEG at quality {}: {} bytes",
        image.width(),
        image.height(),
        quality,
        buf.len()
    );
    Ok(buf)
}
