//! Errors raised while loading or running a segmentation model.

use thiserror::Error;

/// Failure inside the inference layer.
///
/// Runtime messages are kept as strings so the variant set does not depend
/// on which backend is compiled in.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The model file could not be read.
    #[error("cannot read model file: {0}")]
    ModelRead(#[from] std::io::Error),

    /// The bytes were read but do not form a usable ONNX graph.
    #[error("not a usable segmentation model: {0}")]
    InvalidModel(String),

    /// The runtime rejected the session setup (threads, execution providers).
    #[error("cannot set up the ONNX Runtime session: {0}")]
    Runtime(String),

    /// An input tensor does not match its declared shape.
    #[error("bad input tensor: {0}")]
    InvalidTensor(String),

    #[error("model run failed: {0}")]
    Run(String),

    /// The model produced an output of a type or shape we cannot read.
    #[error("unreadable model output: {0}")]
    Output(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_model_file_reads_as_io() {
        let err: InferenceError = std::fs::read("/nonexistent/u2net.onnx").unwrap_err().into();
        assert!(matches!(err, InferenceError::ModelRead(_)));
        assert!(err.to_string().starts_with("cannot read model file: "));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            InferenceError::Output("unsupported output type for 'd0'".to_string()).to_string(),
            "unreadable model output: unsupported output type for 'd0'"
        );
        assert_eq!(
            InferenceError::Runtime("bad thread count".to_string()).to_string(),
            "cannot set up the ONNX Runtime session: bad thread count"
        );
    }
}
