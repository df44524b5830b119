use crate::label::Label;
use image::DynamicImage;
use ndarray::Array3;

/// A single training example: an image (or its tensor form) and its action label.
///
/// Transforms take the sample by value and hand back a new one, so a caller's
/// sample is never observed half-transformed.
///
/// # Examples:
/// - Raw from disk: `LabeledSample<DynamicImage>` with an RGB8 image and `[x, y, left, right]`
/// - Model-ready: `LabeledSample<Array3<f32>>` with a `[3, 96, 96]` tensor
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample<I> {
    pub image: I,
    pub label: Label,
}

/// Sample as decoded from disk and passed through image augmentations.
pub type LabeledImage = LabeledSample<DynamicImage>;

/// Sample after [`ToTensor`](crate::transforms::vision::ToTensor): channel-first `f32` in [0, 1].
pub type LabeledTensor = LabeledSample<Array3<f32>>;

impl<I> LabeledSample<I> {
    pub fn new(image: I, label: impl Into<Label>) -> Self {
        Self {
            image,
            label: label.into(),
        }
    }

    /// Replaces the image, keeping the label.
    pub fn map_image<J>(self, f: impl FnOnce(I) -> J) -> LabeledSample<J> {
        LabeledSample {
            image: f(self.image),
            label: self.label,
        }
    }

    pub fn into_parts(self) -> (I, Label) {
        (self.image, self.label)
    }
}

#[cfg(feature = "tch")]
impl LabeledTensor {
    /// Converts into `(image, label)` libtorch tensors for the training loop.
    ///
    /// The image keeps its `[C, H, W]` layout; the label is a 1-D float tensor.
    pub fn to_tch(&self) -> anyhow::Result<(tch::Tensor, tch::Tensor)> {
        use anyhow::Context;

        let shape: Vec<i64> = self.image.shape().iter().map(|&d| d as i64).collect();
        let contiguous = self.image.as_standard_layout();
        let data = contiguous
            .as_slice()
            .context("Image tensor is not contiguous")?;
        let image = tch::Tensor::from_slice(data).reshape(shape.as_slice());
        let label = tch::Tensor::from_slice(self.label.fields());
        Ok((image, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_map_image_keeps_label() {
        let sample = LabeledSample::new(
            DynamicImage::ImageRgb8(RgbImage::new(2, 3)),
            Label::new(vec![0.0, 1.0, 1.0, 0.0]),
        );
        let mapped = sample.map_image(|img| (img.width(), img.height()));
        assert_eq!(mapped.image, (2, 3));
        assert_eq!(mapped.label.fields(), &[0.0, 1.0, 1.0, 0.0]);
    }
}
