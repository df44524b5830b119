use crate::sample::{LabeledImage, LabeledTensor};
use crate::transforms::Transform;
use anyhow::{ensure, Context, Result};
use image::GenericImageView;
use ndarray::Array3;
use rand::RngCore;

// ============================================================================
// ToTensor
// ============================================================================

/// Converts an image to a channel-first `f32` tensor in [0.0, 1.0] range.
///
/// Every input is converted to RGB first, so the output shape is always
/// `[3, H, W]`. The label passes through untouched.
///
/// # Example
/// ```ignore
/// let converter = ToTensor;
/// let tensor_sample = converter.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl ToTensor {
    pub fn image_to_array(img: &image::DynamicImage) -> Result<Array3<f32>> {
        let (width, height) = img.dimensions();
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive (got {}x{})",
            width,
            height
        );

        let rgb = img.to_rgb8();
        let hwc = Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())
            .context("Failed to reshape pixel buffer to [H, W, C]")?;

        // HWC -> CHW, normalised to [0, 1]
        Ok(hwc
            .permuted_axes([2, 0, 1])
            .mapv(|v| v as f32 / 255.0)
            .as_standard_layout()
            .into_owned())
    }
}

impl Transform<LabeledImage, LabeledTensor> for ToTensor {
    fn apply(&self, sample: LabeledImage, _rng: &mut dyn RngCore) -> Result<LabeledTensor> {
        let (image, label) = sample.into_parts();
        let tensor = Self::image_to_array(&image)?;
        Ok(LabeledTensor::new(tensor, label))
    }
}
