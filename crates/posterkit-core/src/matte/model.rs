//! Known segmentation models and their input conventions.

use std::fmt;
use std::str::FromStr;

use crate::error::MatteError;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// A rembg-compatible salient object segmentation model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatteModel {
    #[default]
    U2net,
    U2netp,
    U2netHumanSeg,
    Silueta,
    IsnetGeneralUse,
}

impl MatteModel {
    pub const ALL: [MatteModel; 5] = [
        MatteModel::U2net,
        MatteModel::U2netp,
        MatteModel::U2netHumanSeg,
        MatteModel::Silueta,
        MatteModel::IsnetGeneralUse,
    ];

    /// Model name as used on the command line and in the config file.
    pub fn name(&self) -> &'static str {
        match self {
            MatteModel::U2net => "u2net",
            MatteModel::U2netp => "u2netp",
            MatteModel::U2netHumanSeg => "u2net_human_seg",
            MatteModel::Silueta => "silueta",
            MatteModel::IsnetGeneralUse => "isnet-general-use",
        }
    }

    /// ONNX file name of the model.
    pub fn filename(&self) -> String {
        format!("{}.onnx", self.name())
    }

    /// Square input side length.
    pub fn input_size(&self) -> u32 {
        match self {
            MatteModel::IsnetGeneralUse => 1024,
            _ => 320,
        }
    }

    /// Per-channel normalization mean.
    pub fn mean(&self) -> [f32; 3] {
        match self {
            MatteModel::IsnetGeneralUse => [0.5; 3],
            _ => IMAGENET_MEAN,
        }
    }

    /// Per-channel normalization standard deviation.
    pub fn std(&self) -> [f32; 3] {
        match self {
            MatteModel::IsnetGeneralUse => [1.0; 3],
            _ => IMAGENET_STD,
        }
    }
}

impl fmt::Display for MatteModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatteModel {
    type Err = MatteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatteModel::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MatteError::UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_names() {
        for model in MatteModel::ALL {
            assert_eq!(model.name().parse::<MatteModel>().unwrap(), model);
        }
        assert!(matches!(
            "u2net-large".parse::<MatteModel>(),
            Err(MatteError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_input_conventions() {
        assert_eq!(MatteModel::U2netp.input_size(), 320);
        assert_eq!(MatteModel::IsnetGeneralUse.input_size(), 1024);
        assert_eq!(MatteModel::IsnetGeneralUse.std(), [1.0; 3]);
        assert_eq!(MatteModel::Silueta.mean(), IMAGENET_MEAN);
        assert_eq!(MatteModel::U2netHumanSeg.filename(), "u2net_human_seg.onnx");
    }
}
