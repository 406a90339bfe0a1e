use enum_dispatch::enum_dispatch;
use image::imageops::resize;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::{tract_ndarray, tract_ndarray::Array4, tract_ndarray::Ix4, Tensor};

use super::ImageTransformResult;
use super::{ResizeGrayImage, ToArray, ToTensor};

#[enum_dispatch]
#[derive(Clone, Serialize, Deserialize)]
pub enum ImageTransform {
    ResizeGrayImage(ResizeGrayImage),
    ToArray(ToArray),
    Normalization(Normalization),
    ToTensor(ToTensor),
}

#[enum_dispatch(ImageTransform)]
pub trait GenericTransform {
    fn transform(&self, input: ImageTransformResult) -> Result<ImageTransformResult, &'static str>;
}

/// Lays the gray samples out as batch, rows, columns, channel.
fn gray_to_array(image: &GrayImage) -> Array4<f32> {
    let (width, height) = image.dimensions();
    tract_ndarray::Array4::from_shape_fn(
        (1_usize, height as usize, width as usize, 1_usize),
        |(_, y, x, c)| image[(x as u32, y as u32)][c] as f32,
    )
}

impl GenericTransform for ResizeGrayImage {
    fn transform(&self, input: ImageTransformResult) -> Result<ImageTransformResult, &'static str> {
        match input {
            ImageTransformResult::GrayImage(image) => {
                if image.width() == 0 || image.height() == 0 {
                    return Err("empty image");
                }
                Ok(resize(
                    &image,
                    self.image_size.width as u32,
                    self.image_size.height as u32,
                    self.filter,
                )
                .into())
            }
            ImageTransformResult::Tensor(_) => Err("Image resize not implemented for Tensor"),
            ImageTransformResult::Array4(_) => Err("Image resize not implemented for Array4"),
        }
    }
}

/// Maps every sample `v` to `(v / 255 - sub) / div` when `zeroone` is set,
/// otherwise to `(v - sub) / div`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Normalization {
    sub: f32,
    div: f32,
    zeroone: bool,
}

impl Normalization {
    pub fn new(sub: f32, div: f32, zeroone: bool) -> Self {
        Normalization { sub, div, zeroone }
    }

    /// Plain `[0, 255] -> [0, 1]` scaling.
    pub fn unit_range() -> Self {
        Normalization::new(0.0, 1.0, true)
    }
}

impl GenericTransform for Normalization {
    fn transform(&self, input: ImageTransformResult) -> Result<ImageTransformResult, &'static str> {
        match input {
            ImageTransformResult::GrayImage(_) => Err("Normalization needs an Array4 input"),
            ImageTransformResult::Tensor(_) => Err("Normalization needs an Array4 input"),
            ImageTransformResult::Array4(arr) => {
                if self.div == 0.0 {
                    return Err("Normalization divisor must not be zero");
                }
                let new_arr = if self.zeroone {
                    (arr / 255.0 - self.sub) / self.div
                } else {
                    (arr - self.sub) / self.div
                };
                Ok(ImageTransformResult::Array4(new_arr))
            }
        }
    }
}

impl GenericTransform for ToArray {
    fn transform(&self, input: ImageTransformResult) -> Result<ImageTransformResult, &'static str> {
        match input {
            ImageTransformResult::GrayImage(image) => Ok(gray_to_array(&image).into()),
            ImageTransformResult::Tensor(tensor) => {
                let dyn_arr = tensor
                    .into_array::<f32>()
                    .map_err(|_| "Cannot convert tensor to Array4")?;
                let arr4 = dyn_arr
                    .into_dimensionality::<Ix4>()
                    .map_err(|_| "Cannot convert dynamic Array to Array4")?;
                Ok(ImageTransformResult::Array4(arr4))
            }
            // already an array
            ImageTransformResult::Array4(arr4) => Ok(ImageTransformResult::Array4(arr4)),
        }
    }
}

impl GenericTransform for ToTensor {
    fn transform(&self, input: ImageTransformResult) -> Result<ImageTransformResult, &'static str> {
        match input {
            ImageTransformResult::GrayImage(image) => {
                let tensor: Tensor = gray_to_array(&image).into();
                Ok(ImageTransformResult::Tensor(tensor))
            }
            // already a tensor
            ImageTransformResult::Tensor(tensor) => Ok(ImageTransformResult::Tensor(tensor)),
            ImageTransformResult::Array4(arr4) => Ok(ImageTransformResult::Tensor(arr4.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageSize;
    use image::imageops::FilterType;
    use image::Luma;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 255 / (width - 1)) as u8]))
    }

    #[test]
    fn resize_hits_requested_size() {
        let step = ResizeGrayImage::new(ImageSize { width: 16, height: 8 }, FilterType::Triangle);
        let result = step.transform(gradient(40, 30).into()).unwrap();
        assert_eq!(result.shape(), vec![8, 16]);
    }

    #[test]
    fn resize_rejects_empty_image() {
        let step = ResizeGrayImage::new(ImageSize::square(4), FilterType::Triangle);
        let err = step.transform(GrayImage::new(0, 0).into()).err();
        assert_eq!(err, Some("empty image"));
    }

    #[test]
    fn to_array_is_channel_last() {
        let image = GrayImage::from_fn(3, 2, |x, y| Luma([(10 * y + x) as u8]));
        let result = ToArray {}.transform(image.into()).unwrap();
        match result {
            ImageTransformResult::Array4(arr) => {
                assert_eq!(arr.shape(), &[1, 2, 3, 1]);
                assert_eq!(arr[[0, 1, 2, 0]], 12.0);
                assert_eq!(arr[[0, 0, 1, 0]], 1.0);
            }
            _ => panic!("expected an Array4"),
        }
    }

    #[test]
    fn unit_range_scales_to_zero_one() {
        let image = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        let arr = ToArray {}.transform(image.into()).unwrap();
        let result = Normalization::unit_range().transform(arr).unwrap();
        match result {
            ImageTransformResult::Array4(arr) => {
                assert_eq!(arr[[0, 0, 0, 0]], 0.0);
                assert_eq!(arr[[0, 0, 1, 0]], 1.0);
            }
            _ => panic!("expected an Array4"),
        }
    }

    #[test]
    fn normalization_refuses_images() {
        let err = Normalization::unit_range()
            .transform(gradient(2, 2).into())
            .err();
        assert!(err.is_some());
    }

    #[test]
    fn tensor_and_array_convert_both_ways() {
        let arr = ToArray {}.transform(gradient(4, 4).into()).unwrap();
        let tensor = ToTensor {}.transform(arr).unwrap();
        assert!(matches!(tensor, ImageTransformResult::Tensor(_)));
        let back = ToArray {}.transform(tensor).unwrap();
        assert_eq!(back.shape(), vec![1, 4, 4, 1]);
    }
}
