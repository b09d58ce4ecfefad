//! Background removal with a salient object segmentation model.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, RgbaImage};
use ndarray::{Array4, ArrayD};
use tracing::debug;

use posterkit_inference::{InferenceBackend, InputTensor};

use crate::error::{MatteError, Result};
use crate::mask::put_alpha;

use super::MatteModel;

/// Input name used when the backend does not report one.
const DEFAULT_INPUT_NAME: &str = "input.1";

/// ONNX Runtime intra-op threads when none are configured.
pub const DEFAULT_INTRA_THREADS: usize = 4;

/// Cuts the foreground out of images using a segmentation backend.
pub struct BackgroundRemover<B: InferenceBackend> {
    backend: B,
    model: MatteModel,
}

impl<B: InferenceBackend> BackgroundRemover<B> {
    /// Create a remover that feeds `backend` inputs shaped for `model`.
    pub fn new(backend: B, model: MatteModel) -> Self {
        Self { backend, model }
    }

    pub fn model(&self) -> MatteModel {
        self.model
    }

    /// Return `image` as RGBA with the predicted foreground mask as alpha.
    pub fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let mask = self.predict_mask(image)?;
        let mut rgba = image.to_rgba8();
        put_alpha(&mut rgba, &mask);
        Ok(rgba)
    }

    /// Predict an 8-bit foreground mask at the size of `image`.
    pub fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage> {
        let input = self.preprocess(image)?;
        let input_name = self
            .backend
            .input_names()
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_INPUT_NAME);

        let outputs = self.backend.run(&[(input_name, input)])?;
        let (name, output) = outputs
            .into_iter()
            .next()
            .ok_or_else(|| MatteError::UnexpectedOutput("model returned no outputs".to_string()))?;

        debug!("Mask output {} with shape {:?}", name, output.shape());
        postprocess(output.into_f32(), image.dimensions())
    }

    /// Resize to the model input and normalize into an NCHW tensor.
    pub fn preprocess(&self, image: &DynamicImage) -> Result<InputTensor> {
        let size = self.model.input_size();
        let rgb = imageops::resize(&image.to_rgb8(), size, size, FilterType::Lanczos3);

        let max = rgb.as_raw().iter().copied().max().unwrap_or(0) as f32;
        let max = max.max(1e-6);
        let (mean, std) = (self.model.mean(), self.model.std());

        let side = size as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, side, side));
        for (x, y, pixel) in rgb.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] = (pixel[c] as f32 / max - mean[c]) / std[c];
            }
        }

        Ok(InputTensor::Float32(tensor.into_dyn()))
    }
}

#[cfg(feature = "native")]
impl BackgroundRemover<posterkit_inference::OrtBackend> {
    /// Load a model file into an ONNX Runtime session.
    pub fn from_model_file(path: &std::path::Path, model: MatteModel) -> Result<Self> {
        Self::from_model_file_with_threads(path, model, DEFAULT_INTRA_THREADS)
    }

    /// Load a model file, running each operator on up to `intra_threads` threads.
    pub fn from_model_file_with_threads(
        path: &std::path::Path,
        model: MatteModel,
        intra_threads: usize,
    ) -> Result<Self> {
        if !path.exists() {
            return Err(MatteError::ModelNotFound(path.to_path_buf()).into());
        }
        let options = posterkit_inference::OrtOptions {
            intra_threads: intra_threads.max(1),
            ..Default::default()
        };
        let backend = posterkit_inference::OrtBackend::from_file_with_options(path, options)?;
        Ok(Self::new(backend, model))
    }
}

/// Turn a raw model prediction into a mask of `size`.
///
/// Only the first channel of the first batch item is used. Values are
/// min-max normalized, so a constant prediction yields an all-zero mask.
pub fn postprocess(output: ArrayD<f32>, size: (u32, u32)) -> Result<GrayImage> {
    let shape = output.shape().to_vec();
    if shape.len() < 2 {
        return Err(MatteError::UnexpectedOutput(format!("mask shape {:?}", shape)).into());
    }
    let (height, width) = (shape[shape.len() - 2], shape[shape.len() - 1]);
    if height == 0 || width == 0 {
        return Err(MatteError::UnexpectedOutput(format!("mask shape {:?}", shape)).into());
    }

    let output = output.as_standard_layout();
    let values: Vec<f32> = output.iter().take(width * height).copied().collect();

    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    let pixels: Vec<u8> = values
        .iter()
        .map(|&v| {
            if range > 0.0 {
                ((v - min) / range * 255.0) as u8
            } else {
                0
            }
        })
        .collect();

    let mask = GrayImage::from_raw(width as u32, height as u32, pixels)
        .ok_or_else(|| MatteError::UnexpectedOutput("mask buffer too small".to_string()))?;
    Ok(imageops::resize(&mask, size.0, size.1, FilterType::Lanczos3))
}

/// Alpha channel of `image` as a grayscale image.
pub fn extract_alpha(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        image::Luma([image.get_pixel(x, y)[3]])
    })
}
