//! ONNX inference abstraction layer for posterkit.
//!
//! Segmentation models used for background removal are opaque to the rest of
//! the workspace: they receive an NCHW tensor and return a probability map.
//! This crate hides the runtime behind [`InferenceBackend`] so the
//! pre/post-processing code can be exercised without a real model.

mod backend;
mod error;
mod tensor;

pub use backend::InferenceBackend;
pub use error::InferenceError;
pub use tensor::{InputTensor, OutputTensor, TensorType};

#[cfg(feature = "native")]
pub use backend::ort::{OrtBackend, OrtOptions};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
