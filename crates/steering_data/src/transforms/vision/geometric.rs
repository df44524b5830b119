use crate::sample::LabeledImage;
use crate::transforms::Transform;
use anyhow::{ensure, Result};
use image::{imageops::FilterType, DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{self, Interpolation};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Side length the steering model expects.
pub const TARGET_SIZE: u32 = 96;

// ============================================================================
// Resize
// ============================================================================

/// Resizes an image to exactly `width` x `height`. The aspect ratio is not
/// preserved, so the output always matches the model input size.
///
/// # Filter Types
/// - `Nearest`: Nearest neighbour, fastest
/// - `Triangle`: Bilinear filter, good all-round default
/// - `CatmullRom`: Bicubic sharpening
/// - `Gaussian`: Blurring/smoothing
/// - `Lanczos3`: Lanczos with window 3, highest quality re-sampling but slowest.
///
/// # Examples
/// ``` ignore
/// let resize = Resize::new(96, 96, FilterType::Triangle)?;
/// let sample = resize.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Resize {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Resize {
    /// Creates a new Resize transform.
    pub fn new(width: u32, height: u32, filter: FilterType) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive after resizing (got {}x{})",
            width,
            height
        );
        Ok(Self {
            width,
            height,
            filter,
        })
    }

    /// Bilinear resize to the 96x96 model input.
    pub fn model_input() -> Self {
        Self {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            filter: FilterType::Triangle,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Transform<LabeledImage, LabeledImage> for Resize {
    fn apply(&self, sample: LabeledImage, _rng: &mut dyn RngCore) -> Result<LabeledImage> {
        Ok(sample.map_image(|img| img.resize_exact(self.width, self.height, self.filter)))
    }
}

// ============================================================================
// RandomRotation
// ============================================================================

/// How pixels that rotate in from outside the frame are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationFill {
    /// Fill with a fixed colour.
    Constant([u8; 3]),
    /// Repeat the nearest edge pixel.
    Edge,
}

impl Default for RotationFill {
    fn default() -> Self {
        RotationFill::Constant([0, 0, 0])
    }
}

/// Rotates the image about its centre by an angle drawn uniformly from
/// `[-degrees, degrees]` (at most 180), with probability `p`. The output keeps the input
/// dimensions and uses nearest-neighbour sampling. The label is unchanged.
///
/// # Example
/// ```ignore
/// let rotate = RandomRotation::new(20.0, 0.5)?;
/// let rotated = rotate.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomRotation {
    degrees: f32,
    p: f64,
    fill: RotationFill,
}

impl RandomRotation {
    pub fn new(degrees: f32, p: f64) -> Result<Self> {
        ensure!(
            (0.0..=180.0).contains(&degrees),
            "Rotation range must be in [0.0, 180.0] degrees (got {})",
            degrees
        );
        ensure!(
            (0.0..=1.0).contains(&p),
            "Probability must be in [0.0, 1.0] range (got {})",
            p
        );
        Ok(Self {
            degrees,
            p,
            fill: RotationFill::default(),
        })
    }

    pub fn with_fill(mut self, fill: RotationFill) -> Self {
        self.fill = fill;
        self
    }

    /// Rotates counter-clockwise by `angle` degrees about the centre pixel,
    /// nearest-neighbour.
    pub fn rotate(img: &RgbImage, angle: f32, fill: RotationFill) -> RgbImage {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 || angle == 0.0 {
            return img.clone();
        }
        let center = ((width as f32 - 1.0) / 2.0, (height as f32 - 1.0) / 2.0);

        match fill {
            // imageproc turns clockwise for positive theta.
            RotationFill::Constant(color) => geometric_transformations::rotate(
                img,
                center,
                -angle.to_radians(),
                Interpolation::Nearest,
                Rgb(color),
            ),
            RotationFill::Edge => Self::rotate_clamped(img, center, angle),
        }
    }

    /// Inverse-mapped rotation that samples the nearest edge pixel for
    /// coordinates outside the frame.
    fn rotate_clamped(img: &RgbImage, (cx, cy): (f32, f32), angle: f32) -> RgbImage {
        let (width, height) = img.dimensions();
        let (sin_a, cos_a) = angle.to_radians().sin_cos();
        let max_x = (width - 1) as f32;
        let max_y = (height - 1) as f32;

        RgbImage::from_fn(width, height, |x, y| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;

            // Image y grows downward, so a counter-clockwise turn on screen
            // samples the source at the inverse rotation.
            let src_x = (cx + dx * cos_a - dy * sin_a).round().clamp(0.0, max_x);
            let src_y = (cy + dx * sin_a + dy * cos_a).round().clamp(0.0, max_y);
            *img.get_pixel(src_x as u32, src_y as u32)
        })
    }
}

impl Transform<LabeledImage, LabeledImage> for RandomRotation {
    fn apply(&self, sample: LabeledImage, rng: &mut dyn RngCore) -> Result<LabeledImage> {
        if !rng.random_bool(self.p) {
            return Ok(sample);
        }

        let angle = if self.degrees > 0.0 {
            rng.random_range(-self.degrees..=self.degrees)
        } else {
            0.0
        };
        tracing::trace!(angle, "rotating sample");

        Ok(sample.map_image(|img| {
            DynamicImage::ImageRgb8(Self::rotate(&img.into_rgb8(), angle, self.fill))
        }))
    }
}
