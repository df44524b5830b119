use crate::label::LabelFlipPolicy;
use crate::sample::LabeledImage;
use crate::transforms::Transform;
use anyhow::{ensure, Context, Result};
use image::{imageops, DynamicImage, RgbImage};
use rand::{Rng, RngCore};

const CHANNELS: usize = 3;

fn ensure_probability(p: f64) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&p),
        "Probability must be in [0.0, 1.0] range (got {})",
        p
    );
    Ok(())
}

// ============================================================================
// RandomHorizontalFlip
// ============================================================================

/// Randomly mirrors images left-right and rewrites the label to match.
///
/// The label is rewritten by exactly one [`LabelFlipPolicy`]: swapping the
/// turn indicators (the default schema) or reversing the whole field order.
///
/// # Example
/// ```ignore
/// let flip = RandomHorizontalFlip::new(0.5, LabelFlipPolicy::SwapTurnIndicators)?;
/// let augmented = flip.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomHorizontalFlip {
    p: f64,
    policy: LabelFlipPolicy,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64, policy: LabelFlipPolicy) -> Result<Self> {
        ensure_probability(p)?;
        Ok(Self { p, policy })
    }

    pub fn policy(&self) -> LabelFlipPolicy {
        self.policy
    }

    /// Mirrors an RGB8 image in place, row by row.
    fn flip_rgb8(img: RgbImage) -> Result<RgbImage> {
        let (width, height) = img.dimensions();
        let row_len = width as usize * CHANNELS;
        let mut pixels = img.into_raw();

        if row_len > 0 {
            for row in pixels.chunks_exact_mut(row_len) {
                // Reversing the row bytes reverses pixel order and channel order;
                // restore the channel order per pixel.
                row.reverse();
                for pixel in row.chunks_exact_mut(CHANNELS) {
                    pixel.reverse();
                }
            }
        }

        RgbImage::from_raw(width, height, pixels).context("Failed to rebuild flipped image buffer")
    }
}

impl Transform<LabeledImage, LabeledImage> for RandomHorizontalFlip {
    fn apply(&self, sample: LabeledImage, rng: &mut dyn RngCore) -> Result<LabeledImage> {
        if !rng.random_bool(self.p) {
            return Ok(sample);
        }

        let (image, label) = sample.into_parts();
        let label = self
            .policy
            .apply(label)
            .context("Failed to mirror label for horizontal flip")?;
        let image = DynamicImage::ImageRgb8(Self::flip_rgb8(image.into_rgb8())?);
        Ok(LabeledImage::new(image, label))
    }
}

// ============================================================================
// RandomVerticalFlip
// ============================================================================

/// Randomly flips images top-to-bottom. The label is unchanged.
///
/// # Example
/// ```ignore
/// let flip = RandomVerticalFlip::new(0.5)?;
/// let augmented = flip.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomVerticalFlip {
    p: f64,
}

impl RandomVerticalFlip {
    pub fn new(p: f64) -> Result<Self> {
        ensure_probability(p)?;
        Ok(Self { p })
    }
}

impl Default for RandomVerticalFlip {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl Transform<LabeledImage, LabeledImage> for RandomVerticalFlip {
    fn apply(&self, sample: LabeledImage, rng: &mut dyn RngCore) -> Result<LabeledImage> {
        if !rng.random_bool(self.p) {
            return Ok(sample);
        }

        let (image, label) = sample.into_parts();
        let mut rgb = image.into_rgb8();
        imageops::flip_vertical_in_place(&mut rgb);
        Ok(LabeledImage::new(DynamicImage::ImageRgb8(rgb), label))
    }
}
