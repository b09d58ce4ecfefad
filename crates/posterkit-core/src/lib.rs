//! Core library for turning images into printable documents.
//!
//! This crate provides:
//! - Poster tiling: scale an image to a physical size and split it across
//!   sheets with registration marks and assembly labels
//! - Print-size PDFs of a single image
//! - Applying grayscale masks as alpha channels
//! - Background removal with ONNX segmentation models

pub mod config;
pub mod error;
pub mod files;
pub mod mask;
pub mod matte;
pub mod pdf;
pub mod poster;
pub mod print;
pub mod units;

pub use config::PosterkitConfig;
pub use error::{MatteError, PosterkitError, ProcessingError, Result};
pub use mask::{apply_mask, apply_mask_files};
pub use matte::{BackgroundRemover, MatteModel};
pub use poster::{create_poster, Page, PageGrid, PosterOptions, PosterSummary, SheetStyle};
pub use print::{convert_image_to_pdf, PrintOptions};
pub use units::{PhysicalSize, SheetSize};

/// Re-export inference types.
pub use posterkit_inference::{InferenceBackend, InputTensor, OutputTensor};

#[cfg(feature = "native")]
pub use posterkit_inference::OrtBackend;
