//! Single-page PDFs that print an image at an exact physical size.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use lopdf::Document;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::files;
use crate::pdf::{self, encode_jpeg, flatten_onto_white, PageContent, SheetWriter};
use crate::units::{cm_to_pt, SheetSize};

/// Default length of the longer printed side.
pub const DEFAULT_TARGET_SIZE_CM: f64 = 14.0;

/// Options for [`convert_image_to_pdf`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintOptions {
    /// Printed length of the image's longer side.
    pub target_size_cm: f64,
    pub sheet: SheetSize,
    pub jpeg_quality: u8,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            target_size_cm: DEFAULT_TARGET_SIZE_CM,
            sheet: SheetSize::A4,
            jpeg_quality: 95,
        }
    }
}

/// Printed size of a `width × height` image whose longer side is `target_cm`.
///
/// Square images are treated as landscape.
pub fn fit_print_size(width: u32, height: u32, target_cm: f64) -> (f64, f64) {
    let aspect = width as f64 / height as f64;
    if width >= height {
        (target_cm, target_cm / aspect)
    } else {
        (target_cm * aspect, target_cm)
    }
}

/// Build a one-page PDF with `image` centered at its print size.
pub fn render_print_document(image: &DynamicImage, options: &PrintOptions) -> Result<Document> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions("source image is empty".to_string()).into());
    }
    if !(options.target_size_cm.is_finite() && options.target_size_cm > 0.0) {
        return Err(ProcessingError::InvalidDimensions(format!(
            "print size must be positive, got {} cm",
            options.target_size_cm
        ))
        .into());
    }

    let (width_cm, height_cm) = fit_print_size(width, height, options.target_size_cm);
    info!("Size in PDF: {:.2} x {:.2} cm", width_cm, height_cm);

    let mut writer = SheetWriter::new(options.sheet);
    let (sheet_width, sheet_height) = writer.sheet_size_pt();

    let rgb = flatten_onto_white(image);
    let jpeg = encode_jpeg(&rgb, options.jpeg_quality)?;
    let image_id = writer.add_jpeg(jpeg, width, height);

    let (draw_width, draw_height) = (cm_to_pt(width_cm), cm_to_pt(height_cm));
    let mut content = PageContent::new();
    content.draw_image(
        image_id,
        (sheet_width - draw_width) / 2.0,
        (sheet_height - draw_height) / 2.0,
        draw_width,
        draw_height,
    );
    writer.add_page(content)?;

    Ok(writer.finish())
}

/// Load `input` and write its print-size PDF to `output`.
///
/// Returns the printed size in centimeters.
pub fn convert_image_to_pdf(
    input: &Path,
    output: &Path,
    options: &PrintOptions,
) -> Result<(f64, f64)> {
    let image = files::load_image(input)?;
    let printed = fit_print_size(image.width(), image.height(), options.target_size_cm);

    let document = render_print_document(&image, options)?;
    files::write_atomically(output, &pdf::to_bytes(document)?)?;

    info!("PDF successfully created: {}", output.display());
    Ok(printed)
}

/// Default output path: `<stem>_<size>cm.pdf`.
pub fn default_output_path(input: &Path, target_size_cm: f64) -> std::path::PathBuf {
    files::sibling_path(input, &format!("_{}cm.pdf", target_size_cm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lopdf::content::Content;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fit_print_size() {
        assert_eq!(fit_print_size(400, 200, 14.0), (14.0, 7.0));
        assert_eq!(fit_print_size(200, 400, 14.0), (7.0, 14.0));
        assert_eq!(fit_print_size(300, 300, 10.0), (10.0, 10.0));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("dir/photo.jpg"), 14.0),
            Path::new("dir/photo_14cm.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("photo.png"), 9.5),
            Path::new("photo_9.5cm.pdf")
        );
    }

    #[test]
    fn test_image_is_centered_at_print_size() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([1, 2, 3])));
        let doc = render_print_document(&image, &PrintOptions::default()).unwrap();
        let doc = Document::load_mem(&pdf::to_bytes(doc).unwrap()).unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let content = Content::decode(&doc.get_page_content(pages[&1]).unwrap()).unwrap();
        let cm = content.operations.iter().find(|op| op.operator == "cm").unwrap();
        let values: Vec<f32> = cm.operands.iter().map(|o| o.as_float().unwrap()).collect();

        let (sheet_w, sheet_h) = SheetSize::A4.to_pt();
        let (w, h) = (cm_to_pt(14.0), cm_to_pt(7.0));
        let expected = [w, 0.0, 0.0, h, (sheet_w - w) / 2.0, (sheet_h - h) / 2.0];
        for (got, want) in values.iter().zip(expected) {
            assert!((got - want).abs() < 0.01, "{got} != {want}");
        }
    }

    #[test]
    fn test_rejects_non_positive_size() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let options = PrintOptions {
            target_size_cm: 0.0,
            ..PrintOptions::default()
        };
        assert!(render_print_document(&image, &options).is_err());
    }
}
