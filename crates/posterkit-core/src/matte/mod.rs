//! Background removal.
//!
//! The segmentation model is run through [`posterkit_inference::InferenceBackend`];
//! this module only owns tensor preparation and mask post-processing.

mod model;
mod remover;

pub use model::MatteModel;
pub use remover::{extract_alpha, postprocess, BackgroundRemover, DEFAULT_INTRA_THREADS};

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::info;

use posterkit_inference::InferenceBackend;

use crate::error::Result;
use crate::files;

/// Default cutout path: `<stem>_no_bg.png`.
pub fn default_output_path(input: &Path) -> PathBuf {
    files::sibling_path(input, "_no_bg.png")
}

/// Mask path derived from a cutout path: `.png` becomes `_mask.png`.
pub fn mask_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{}_mask.png", stem))
}

/// Remove the background of `input`, write the cutout PNG to `output` and,
/// when `mask_output` is given, the alpha mask as a grayscale PNG.
///
/// The mask is only written once the cutout is on disk.
pub fn remove_background_file<B: InferenceBackend>(
    remover: &BackgroundRemover<B>,
    input: &Path,
    output: &Path,
    mask_output: Option<&Path>,
) -> Result<()> {
    let image = files::load_image(input)?;

    info!("Removing background with {}", remover.model());
    let cutout = remover.remove_background(&image)?;
    let mask = mask_output.map(|path| (path, extract_alpha(&cutout)));

    files::save_png(&DynamicImage::ImageRgba8(cutout), output)?;
    info!("Background removed, saved as: {}", output.display());

    if let Some((mask_path, mask)) = mask {
        files::save_png(&DynamicImage::ImageLuma8(mask), mask_path)?;
        info!("Mask saved as: {}", mask_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use ndarray::ArrayD;
    use posterkit_inference::{InputTensor, OutputTensor};
    use pretty_assertions::assert_eq;

    /// Predicts foreground on the right half of the model input.
    struct HalfBackend {
        names: Vec<String>,
    }

    impl InferenceBackend for HalfBackend {
        fn run(
            &self,
            _inputs: &[(&str, InputTensor)],
        ) -> posterkit_inference::Result<Vec<(String, OutputTensor)>> {
            let mask = ArrayD::from_shape_fn(vec![1, 1, 8, 8], |idx| {
                if idx[3] < 4 { 0.0 } else { 1.0 }
            });
            Ok(vec![("d0".to_string(), OutputTensor::Float32(mask))])
        }

        fn input_names(&self) -> &[String] {
            &self.names
        }

        fn output_names(&self) -> &[String] {
            &self.names
        }
    }

    fn remover() -> BackgroundRemover<HalfBackend> {
        let backend = HalfBackend {
            names: vec!["input.1".to_string()],
        };
        BackgroundRemover::new(backend, MatteModel::U2netp)
    }

    fn write_input(dir: &Path) -> PathBuf {
        let input = dir.join("cat.png");
        RgbImage::from_pixel(16, 8, Rgb([10, 20, 30])).save(&input).unwrap();
        input
    }

    #[test]
    fn test_remove_background_file_writes_cutout_and_mask() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = default_output_path(&input);
        let mask = mask_output_path(&output);

        remove_background_file(&remover(), &input, &output, Some(&mask)).unwrap();

        let cutout = image::open(&output).unwrap().to_rgba8();
        assert_eq!(cutout.dimensions(), (16, 8));
        assert_eq!(cutout.get_pixel(0, 4)[3], 0);
        assert_eq!(cutout.get_pixel(15, 4)[3], 255);

        let mask = image::open(&mask).unwrap().to_luma8();
        assert_eq!(mask.get_pixel(0, 4)[0], 0);
        assert_eq!(mask.get_pixel(15, 4)[0], 255);
    }

    #[test]
    fn test_failed_cutout_leaves_no_mask() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("missing_dir").join("cat_no_bg.png");
        let mask = dir.path().join("cat_no_bg_mask.png");

        assert!(remove_background_file(&remover(), &input, &output, Some(&mask)).is_err());
        assert!(!output.exists());
        assert!(!mask.exists());
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(default_output_path(Path::new("in/cat.jpg")), Path::new("in/cat_no_bg.png"));
        assert_eq!(
            mask_output_path(Path::new("out/cat_no_bg.png")),
            Path::new("out/cat_no_bg_mask.png")
        );
    }
}
