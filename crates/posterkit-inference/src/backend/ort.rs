//! ONNX Runtime (ort) backend for native platforms with XNNPACK.

use std::path::Path;
use std::sync::Mutex;

use ndarray::ArrayD;
use ort::ep::XNNPACK;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use crate::error::InferenceError;
use crate::tensor::{InputTensor, OutputTensor};
use crate::{InferenceBackend, Result};

/// Session options for [`OrtBackend`].
#[derive(Debug, Clone, Copy)]
pub struct OrtOptions {
    /// Number of intra-op threads.
    pub intra_threads: usize,
    /// Register the XNNPACK execution provider.
    pub use_xnnpack: bool,
}

impl Default for OrtOptions {
    fn default() -> Self {
        Self {
            intra_threads: 4,
            use_xnnpack: true,
        }
    }
}

/// Backend using ONNX Runtime for native inference.
pub struct OrtBackend {
    session: Mutex<Session>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl OrtBackend {
    /// Load a model from a file path with default options.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_options(path, OrtOptions::default())
    }

    /// Load a model from a file path.
    pub fn from_file_with_options<P: AsRef<Path>>(path: P, options: OrtOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading ONNX model from: {}", path.display());

        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, options)
    }

    /// Load a model from bytes.
    pub fn from_bytes(bytes: &[u8], options: OrtOptions) -> Result<Self> {
        debug!("Loading ONNX model from {} bytes ({:?})", bytes.len(), options);

        let mut builder = Session::builder()
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        if options.use_xnnpack {
            builder = builder
                .with_execution_providers([XNNPACK::default().build()])
                .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        }

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Runtime(e.to_string()))?
            .with_intra_threads(options.intra_threads)
            .map_err(|e| InferenceError::Runtime(e.to_string()))?
            .commit_from_memory(bytes)
            .map_err(|e| InferenceError::InvalidModel(e.to_string()))?;

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|i| i.name().to_string())
            .collect();

        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|o| o.name().to_string())
            .collect();

        debug!("Model inputs: {:?}", input_names);
        debug!("Model outputs: {:?}", output_names);

        Ok(Self {
            session: Mutex::new(session),
            input_names,
            output_names,
        })
    }

    fn convert_input(
        &self,
        tensor: &InputTensor,
    ) -> Result<ort::session::SessionInputValue<'static>> {
        let shape: Vec<i64> = tensor.shape().iter().map(|&s| s as i64).collect();
        match tensor {
            InputTensor::Float32(arr) => {
                let data: Vec<f32> = arr.iter().cloned().collect();
                Tensor::from_array((shape, data))
                    .map(Into::into)
                    .map_err(|e| InferenceError::InvalidTensor(e.to_string()))
            }
            InputTensor::Uint8(arr) => {
                let data: Vec<u8> = arr.iter().cloned().collect();
                Tensor::from_array((shape, data))
                    .map(Into::into)
                    .map_err(|e| InferenceError::InvalidTensor(e.to_string()))
            }
        }
    }
}

fn to_array<T: Clone>(shape_ref: &[i64], data: &[T]) -> Result<ArrayD<T>> {
    let shape: Vec<usize> = shape_ref.iter().map(|&s| s as usize).collect();
    ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data.to_vec())
        .map_err(|e| InferenceError::Output(e.to_string()))
}

impl InferenceBackend for OrtBackend {
    fn run(&self, inputs: &[(&str, InputTensor)]) -> Result<Vec<(String, OutputTensor)>> {
        let ort_inputs: Vec<(&str, ort::session::SessionInputValue<'static>)> = inputs
            .iter()
            .map(|(name, tensor)| {
                let value = self.convert_input(tensor)?;
                Ok((*name, value))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Run(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort_inputs)
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let mut results = Vec::with_capacity(outputs.len());

        for (name, value) in outputs.iter() {
            let tensor = if let Ok((shape, data)) = value.try_extract_tensor::<f32>() {
                OutputTensor::Float32(to_array(shape, data)?)
            } else if let Ok((shape, data)) = value.try_extract_tensor::<f64>() {
                OutputTensor::Float64(to_array(shape, data)?)
            } else if let Ok((shape, data)) = value.try_extract_tensor::<u8>() {
                OutputTensor::Uint8(to_array(shape, data)?)
            } else {
                return Err(InferenceError::Output(
                    format!("unsupported output type for '{}'", name),
                ));
            };

            results.push((name.to_string(), tensor));
        }

        Ok(results)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}
