use std::path::Path;

use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::GrayImage;
use tract_onnx::prelude::Tensor;
use tracing::debug;

use super::transformer::Normalization;
use super::{GenericTransform, ImageTransform};
use super::{ImageSize, ResizeGrayImage, ToTensor};
use super::{ImageTransformResult, ToArray};
use crate::error::{Result, ScanError};
use crate::ScanConfig;

/// Turns an image file into the `(1, height, width, 1)` tensor, scaled to `[0, 1]`,
/// that a recognizer consumes.
pub struct TransformationPipeline {
    steps: Vec<ImageTransform>,
    image_size: ImageSize,
}

impl TransformationPipeline {
    pub fn new(image_size: ImageSize, filter: FilterType) -> Self {
        TransformationPipeline {
            steps: vec![
                ResizeGrayImage::new(image_size, filter).into(),
                ToArray {}.into(),
                Normalization::unit_range().into(),
                ToTensor {}.into(),
            ],
            image_size,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        TransformationPipeline::new(config.image_size, config.filter)
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Checks that `path` exists and decodes it as a single channel image.
    /// The format is sniffed from the file content, the extension is only a fallback.
    pub fn load_image(path: &Path) -> Result<GrayImage> {
        if !path.exists() {
            debug!(path = %path.display(), "input image does not exist");
            return Err(ScanError::FileNotFound(path.to_path_buf()));
        }
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_luma8();
        debug!(
            width = image.width(),
            height = image.height(),
            "decoded grayscale image"
        );
        Ok(image)
    }

    pub fn transform_image(&self, image: GrayImage) -> Result<Tensor> {
        let mut result = ImageTransformResult::GrayImage(image);

        for step in &self.steps {
            result = step
                .transform(result)
                .map_err(|msg| ScanError::ImageProcessing(msg.to_string()))?;
            debug!(shape = ?result.shape(), "transform step done");
        }

        match result {
            ImageTransformResult::Tensor(t) => Ok(t),
            _ => Err(ScanError::ImageProcessing(
                "Should be converted to tensor already".to_string(),
            )),
        }
    }

    pub fn preprocess(&self, path: &Path) -> Result<Tensor> {
        debug!(path = %path.display(), target = ?self.image_size(), "preprocessing");
        let image = TransformationPipeline::load_image(path)?;
        self.transform_image(image)
    }
}

impl Default for TransformationPipeline {
    fn default() -> Self {
        TransformationPipeline::from_config(&ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn produces_batch_of_one_channel_last() {
        let image = GrayImage::from_fn(300, 200, |x, y| Luma([((x + y) % 256) as u8]));
        let pipeline = TransformationPipeline::default();
        assert_eq!(pipeline.image_size(), ImageSize::square(128));
        let tensor = pipeline.transform_image(image).unwrap();
        assert_eq!(tensor.shape(), &[1, 128, 128, 1]);

        let view = tensor.to_array_view::<f32>().unwrap();
        assert!(view.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn white_image_maps_to_ones() {
        let image = GrayImage::from_pixel(10, 10, Luma([255]));
        let tensor = TransformationPipeline::new(ImageSize::square(4), FilterType::Triangle)
            .transform_image(image)
            .unwrap();
        let view = tensor.to_array_view::<f32>().unwrap();
        assert_eq!(view.len(), 16);
        assert!(view.iter().all(|v| (*v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TransformationPipeline::load_image(Path::new("definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, ScanError::FileNotFound(_)));
    }

    #[test]
    fn format_comes_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("source.png");
        GrayImage::from_pixel(20, 10, Luma([90])).save(&png).unwrap();

        for name in ["upload0a1b2c", "photo.jpg"] {
            let path = dir.path().join(name);
            std::fs::copy(&png, &path).unwrap();
            let image = TransformationPipeline::load_image(&path).unwrap();
            assert_eq!(image.dimensions(), (20, 10));
            assert_eq!(image.get_pixel(0, 0)[0], 90);
        }
    }

    #[test]
    fn empty_image_fails_processing() {
        let err = TransformationPipeline::default()
            .transform_image(GrayImage::new(0, 0))
            .unwrap_err();
        assert_eq!(err.to_string(), "Image processing failed: empty image");
    }
}
