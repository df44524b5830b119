use crate::sample::LabeledImage;
use crate::transforms::Transform;
use anyhow::{ensure, Result};
use image::{DynamicImage, Rgb};
use rand::RngCore;

// ============================================================================
// ColorRemap
// ============================================================================

/// Recolours "grey band" pixels, i.e. road surface, to a fixed colour.
///
/// A pixel is replaced when every channel lies in `[low, high]`; all other
/// pixels are left as they are. The defaults repaint grey pavement
/// (`[100, 200]`) as a dirt-road brown `(139, 69, 19)`.
///
/// # Example
/// ```ignore
/// let street = ColorRemap::street_color();
/// let recoloured = street.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRemap {
    low: u8,
    high: u8,
    target: [u8; 3],
}

impl ColorRemap {
    pub const GREY_LOW: u8 = 100;
    pub const GREY_HIGH: u8 = 200;
    pub const BROWN: [u8; 3] = [139, 69, 19];

    pub fn new(low: u8, high: u8, target: [u8; 3]) -> Result<Self> {
        ensure!(
            low <= high,
            "Colour band lower bound {} exceeds upper bound {}",
            low,
            high
        );
        Ok(Self { low, high, target })
    }

    /// Grey pavement to brown.
    pub fn street_color() -> Self {
        Self {
            low: Self::GREY_LOW,
            high: Self::GREY_HIGH,
            target: Self::BROWN,
        }
    }

    fn in_band(&self, pixel: &Rgb<u8>) -> bool {
        pixel.0.iter().all(|c| (self.low..=self.high).contains(c))
    }
}

impl Default for ColorRemap {
    fn default() -> Self {
        Self::street_color()
    }
}

impl Transform<LabeledImage, LabeledImage> for ColorRemap {
    fn apply(&self, sample: LabeledImage, _rng: &mut dyn RngCore) -> Result<LabeledImage> {
        Ok(sample.map_image(|img| {
            let mut rgb = img.into_rgb8();
            for pixel in rgb.pixels_mut() {
                if self.in_band(pixel) {
                    *pixel = Rgb(self.target);
                }
            }
            DynamicImage::ImageRgb8(rgb)
        }))
    }
}

// ============================================================================
// Grayscale3Channel
// ============================================================================

/// Desaturates the image while keeping three channels.
///
/// Luminance is `0.299 R + 0.587 G + 0.114 B`, rounded and replicated to
/// every channel, so the model input shape stays `[3, H, W]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Grayscale3Channel;

impl Grayscale3Channel {
    pub fn luminance(pixel: &Rgb<u8>) -> u8 {
        let [r, g, b] = pixel.0;
        let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl Transform<LabeledImage, LabeledImage> for Grayscale3Channel {
    fn apply(&self, sample: LabeledImage, _rng: &mut dyn RngCore) -> Result<LabeledImage> {
        Ok(sample.map_image(|img| {
            let mut rgb = img.into_rgb8();
            for pixel in rgb.pixels_mut() {
                let y = Self::luminance(pixel);
                *pixel = Rgb([y, y, y]);
            }
            DynamicImage::ImageRgb8(rgb)
        }))
    }
}
