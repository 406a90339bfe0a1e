pub mod compliance;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod recognizer;
pub mod report;
pub mod transformer;

pub use compliance::{
    AcademicLoadRule, ComplianceChecker, ComplianceReport, ComplianceRule,
    ConsecutiveAcademicRule, SubjectCountRule, WellnessSessionRule,
};
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use pipeline::TransformationPipeline;
pub use recognizer::{RecognizedTimetable, Recognizer, StaticRecognizer};
pub use report::{AnalysisReport, ErrorReport};

use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::{tract_ndarray::Array4, Tensor};

pub use transformer::{GenericTransform, ImageTransform};

/// Side length of the square input the recognizer expects.
pub const TARGET_SIZE: usize = 128;

#[derive(Serialize, Deserialize)]
#[serde(remote = "FilterType")]
pub enum FilterOption {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub fn square(side: usize) -> Self {
        ImageSize {
            width: side,
            height: side,
        }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize::square(TARGET_SIZE)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ResizeGrayImage {
    image_size: ImageSize,
    #[serde(with = "FilterOption")]
    filter: FilterType,
}

impl ResizeGrayImage {
    pub fn new(image_size: ImageSize, filter: FilterType) -> Self {
        ResizeGrayImage { image_size, filter }
    }
}

/// Converts a gray image into a raw `(1, height, width, 1)` array.
#[derive(Clone, Serialize, Deserialize)]
pub struct ToArray {}

#[derive(Clone, Serialize, Deserialize)]
pub struct ToTensor {}

pub enum ImageTransformResult {
    GrayImage(GrayImage),
    Array4(Array4<f32>),
    Tensor(Tensor),
}

impl ImageTransformResult {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ImageTransformResult::GrayImage(image) => {
                let (width, height) = image.dimensions();
                vec![height as usize, width as usize]
            }
            ImageTransformResult::Array4(array) => array.shape().to_vec(),
            ImageTransformResult::Tensor(tensor) => tensor.shape().to_vec(),
        }
    }
}

impl From<GrayImage> for ImageTransformResult {
    fn from(gray_image: GrayImage) -> Self {
        ImageTransformResult::GrayImage(gray_image)
    }
}

impl From<Array4<f32>> for ImageTransformResult {
    fn from(array: Array4<f32>) -> Self {
        ImageTransformResult::Array4(array)
    }
}

impl From<Tensor> for ImageTransformResult {
    fn from(tensor: Tensor) -> Self {
        ImageTransformResult::Tensor(tensor)
    }
}

/// Preprocesses the image at `path`, runs `recognizer` on the tensor and checks
/// the recognized subjects.
pub fn analyze(
    path: &Path,
    pipeline: &TransformationPipeline,
    recognizer: &dyn Recognizer,
    checker: &ComplianceChecker,
) -> Result<AnalysisReport> {
    let tensor = pipeline.preprocess(path)?;
    let timetable = recognizer.recognize(&tensor)?;
    let compliance = checker.check(&timetable.subjects);
    Ok(AnalysisReport::success(timetable, compliance))
}
