//! Ordered augmentation pipelines.
//!
//! [`Augmentation`] is the closed set of image-to-image transforms a pipeline
//! may hold; [`Compose`] applies a list of them left to right. A pipeline is
//! immutable once built and can be applied to any number of samples, from any
//! number of threads, each caller supplying its own random source.
//!
//! Pipelines can also be described as data with [`AugmentationConfig`]:
//!
//! ```json
//! [
//!   { "type": "random_horizontal_flip", "p": 0.5 },
//!   { "type": "random_rotation", "degrees": 20.0, "p": 0.5 },
//!   { "type": "resize" }
//! ]
//! ```
//!
//! A description ending in `{ "type": "to_tensor" }` builds a
//! [`TensorPipeline`] with [`Compose::tensor_pipeline_from_json`].

use crate::label::LabelFlipPolicy;
use crate::sample::LabeledImage;
use crate::transforms::vision::{
    ColorRemap, Grayscale3Channel, RandomHorizontalFlip, RandomRotation, RandomVerticalFlip,
    Resize, RotationFill, ToTensor, TARGET_SIZE,
};
use crate::transforms::{Chain, Transform};
use anyhow::{bail, ensure, Context, Result};
use image::imageops::FilterType;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A single label-consistent image augmentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Augmentation {
    Resize(Resize),
    RandomVerticalFlip(RandomVerticalFlip),
    RandomHorizontalFlip(RandomHorizontalFlip),
    RandomRotation(RandomRotation),
    ColorRemap(ColorRemap),
    Grayscale3Channel(Grayscale3Channel),
}

impl Augmentation {
    pub fn name(&self) -> &'static str {
        match self {
            Augmentation::Resize(_) => "resize",
            Augmentation::RandomVerticalFlip(_) => "random_vertical_flip",
            Augmentation::RandomHorizontalFlip(_) => "random_horizontal_flip",
            Augmentation::RandomRotation(_) => "random_rotation",
            Augmentation::ColorRemap(_) => "color_remap",
            Augmentation::Grayscale3Channel(_) => "grayscale3_channel",
        }
    }
}

impl Transform<LabeledImage, LabeledImage> for Augmentation {
    fn apply(&self, sample: LabeledImage, rng: &mut dyn RngCore) -> Result<LabeledImage> {
        match self {
            Augmentation::Resize(t) => t.apply(sample, rng),
            Augmentation::RandomVerticalFlip(t) => t.apply(sample, rng),
            Augmentation::RandomHorizontalFlip(t) => t.apply(sample, rng),
            Augmentation::RandomRotation(t) => t.apply(sample, rng),
            Augmentation::ColorRemap(t) => t.apply(sample, rng),
            Augmentation::Grayscale3Channel(t) => t.apply(sample, rng),
        }
    }
}

macro_rules! impl_from_transform {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Augmentation {
                fn from(t: $variant) -> Self {
                    Augmentation::$variant(t)
                }
            }
        )*
    };
}

impl_from_transform!(
    Resize,
    RandomVerticalFlip,
    RandomHorizontalFlip,
    RandomRotation,
    ColorRemap,
    Grayscale3Channel,
);

/// Applies an ordered list of augmentations, each consuming the previous
/// output. The empty pipeline is the identity.
///
/// # Example
/// ```ignore
/// let pipeline = Compose::new(vec![
///     RandomHorizontalFlip::new(0.5, LabelFlipPolicy::SwapTurnIndicators)?.into(),
///     ColorRemap::street_color().into(),
///     Resize::model_input().into(),
/// ]);
/// let augmented = pipeline.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compose {
    steps: Vec<Augmentation>,
}

impl Compose {
    pub fn new(steps: Vec<Augmentation>) -> Self {
        tracing::debug!(
            steps = ?steps.iter().map(Augmentation::name).collect::<Vec<_>>(),
            "built augmentation pipeline"
        );
        Self { steps }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Resize to the 96x96 model input, nothing else.
    pub fn resize_only() -> Self {
        Self::new(vec![Resize::model_input().into()])
    }

    /// The standard training augmentations: random horizontal and vertical
    /// flips, street recolouring and a ±20° rotation, each flip and the
    /// rotation applied with probability 0.5.
    pub fn training_augmentations() -> Result<Self> {
        Ok(Self::new(vec![
            RandomHorizontalFlip::new(0.5, LabelFlipPolicy::SwapTurnIndicators)?.into(),
            RandomVerticalFlip::new(0.5)?.into(),
            ColorRemap::street_color().into(),
            RandomRotation::new(20.0, 0.5)?.into(),
        ]))
    }

    /// Appends a step to the end of the pipeline.
    pub fn with_step(mut self, step: impl Into<Augmentation>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Builds a pipeline from declarative step descriptions.
    pub fn from_config(configs: &[AugmentationConfig]) -> Result<Self> {
        let steps = configs
            .iter()
            .enumerate()
            .map(|(i, config)| {
                config
                    .build()
                    .with_context(|| format!("Invalid augmentation at position {}", i))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(steps))
    }

    /// Parses a JSON array of [`AugmentationConfig`] and builds the pipeline.
    pub fn from_json(json: &str) -> Result<Self> {
        let configs: Vec<AugmentationConfig> =
            serde_json::from_str(json).context("Failed to parse augmentation config")?;
        Self::from_config(&configs)
    }

    /// Parses a JSON array of steps that ends with `{ "type": "to_tensor" }`
    /// and builds the augmentations followed by [`ToTensor`].
    pub fn tensor_pipeline_from_json(json: &str) -> Result<TensorPipeline> {
        let mut entries: Vec<PipelineEntry> =
            serde_json::from_str(json).context("Failed to parse augmentation config")?;
        ensure!(
            matches!(entries.pop(), Some(PipelineEntry::Terminal(TerminalConfig::ToTensor))),
            "Tensor pipeline must end with a to_tensor step"
        );

        let configs = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                PipelineEntry::Step(config) => Ok(config),
                PipelineEntry::Terminal(_) => {
                    bail!("to_tensor must be the last step (found at position {})", i)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_config(&configs)?.then(ToTensor))
    }

    pub fn steps(&self) -> &[Augmentation] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transform<LabeledImage, LabeledImage> for Compose {
    fn apply(&self, sample: LabeledImage, rng: &mut dyn RngCore) -> Result<LabeledImage> {
        self.steps
            .iter()
            .enumerate()
            .try_fold(sample, |sample, (i, step)| {
                tracing::trace!(step = i, name = step.name(), "applying augmentation");
                step.apply(sample, rng)
                    .with_context(|| format!("Augmentation step {} ({}) failed", i, step.name()))
            })
    }
}

/// Augmentations followed by tensor conversion.
pub type TensorPipeline = Chain<Compose, ToTensor, LabeledImage>;

fn default_size() -> u32 {
    TARGET_SIZE
}

fn default_probability() -> f64 {
    0.5
}

fn default_grey_low() -> u8 {
    ColorRemap::GREY_LOW
}

fn default_grey_high() -> u8 {
    ColorRemap::GREY_HIGH
}

fn default_brown() -> [u8; 3] {
    ColorRemap::BROWN
}

/// Serialisable description of one pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AugmentationConfig {
    Resize {
        #[serde(default = "default_size")]
        width: u32,
        #[serde(default = "default_size")]
        height: u32,
    },
    RandomVerticalFlip {
        #[serde(default = "default_probability")]
        p: f64,
    },
    RandomHorizontalFlip {
        #[serde(default = "default_probability")]
        p: f64,
        #[serde(default)]
        policy: LabelFlipPolicy,
    },
    RandomRotation {
        degrees: f32,
        #[serde(default = "default_probability")]
        p: f64,
        #[serde(default)]
        fill: RotationFill,
    },
    ColorRemap {
        #[serde(default = "default_grey_low")]
        low: u8,
        #[serde(default = "default_grey_high")]
        high: u8,
        #[serde(default = "default_brown")]
        target: [u8; 3],
    },
    Grayscale3Channel,
}

/// Step that converts the augmented sample to a tensor; valid only last.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TerminalConfig {
    ToTensor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum PipelineEntry {
    Step(AugmentationConfig),
    Terminal(TerminalConfig),
}

impl AugmentationConfig {
    pub fn build(&self) -> Result<Augmentation> {
        Ok(match *self {
            AugmentationConfig::Resize { width, height } => {
                Resize::new(width, height, FilterType::Triangle)?.into()
            }
            AugmentationConfig::RandomVerticalFlip { p } => RandomVerticalFlip::new(p)?.into(),
            AugmentationConfig::RandomHorizontalFlip { p, policy } => {
                RandomHorizontalFlip::new(p, policy)?.into()
            }
            AugmentationConfig::RandomRotation { degrees, p, fill } => {
                RandomRotation::new(degrees, p)?.with_fill(fill).into()
            }
            AugmentationConfig::ColorRemap { low, high, target } => {
                ColorRemap::new(low, high, target)?.into()
            }
            AugmentationConfig::Grayscale3Channel => Grayscale3Channel.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use rand::{rngs::StdRng, SeedableRng};

    fn test_sample() -> LabeledImage {
        let mut img = RgbImage::new(6, 4);
        for y in 0..4 {
            for x in 0..6 {
                img.put_pixel(x, y, Rgb([(x * 40) as u8, (y * 60) as u8, 150]));
            }
        }
        LabeledImage::new(
            DynamicImage::ImageRgb8(img),
            Label::new(vec![0.2, -0.4, 1.0, 0.0]),
        )
    }

    fn deterministic_steps() -> Result<Vec<Augmentation>> {
        Ok(vec![
            RandomHorizontalFlip::new(1.0, LabelFlipPolicy::SwapTurnIndicators)?.into(),
            ColorRemap::street_color().into(),
            RandomVerticalFlip::new(0.0)?.into(),
            Resize::new(3, 3, FilterType::Nearest)?.into(),
        ])
    }

    #[test]
    fn test_empty_pipeline_is_identity() -> Result<()> {
        let sample = test_sample();
        let out = Compose::identity().apply(sample.clone(), &mut StdRng::seed_from_u64(0))?;
        assert_eq!(out, sample);
        Ok(())
    }

    #[test]
    fn test_pipeline_applies_in_order() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let pipeline = Compose::new(deterministic_steps()?);
        let out = pipeline.apply(test_sample(), &mut rng)?;

        assert_eq!(out.image.dimensions(), (3, 3));
        assert_eq!(out.label.fields(), &[0.2, -0.4, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_pipeline_grouping_is_associative() -> Result<()> {
        let steps = deterministic_steps()?;

        let whole = Compose::new(steps.clone()).apply(test_sample(), &mut StdRng::seed_from_u64(1))?;

        let mut rng = StdRng::seed_from_u64(1);
        let head = Compose::new(steps[..3].to_vec()).apply(test_sample(), &mut rng)?;
        let grouped = Compose::new(steps[3..].to_vec()).apply(head, &mut rng)?;

        assert_eq!(whole, grouped);
        Ok(())
    }

    #[test]
    fn test_same_seed_reproduces_random_pipeline() -> Result<()> {
        let pipeline = Compose::training_augmentations()?;
        for seed in 0..8 {
            let a = pipeline.apply(test_sample(), &mut StdRng::seed_from_u64(seed))?;
            let b = pipeline.apply(test_sample(), &mut StdRng::seed_from_u64(seed))?;
            assert_eq!(a, b);
        }
        Ok(())
    }

    #[test]
    fn test_step_error_names_failing_step() -> Result<()> {
        let pipeline = Compose::new(vec![
            ColorRemap::street_color().into(),
            RandomHorizontalFlip::new(1.0, LabelFlipPolicy::SwapTurnIndicators)?.into(),
        ]);
        let short = LabeledImage::new(test_sample().image, Label::new(vec![0.75, -12.0]));

        let err = pipeline
            .apply(short, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(err.to_string().contains("step 1 (random_horizontal_flip)"));
        Ok(())
    }

    #[test]
    fn test_from_json() -> Result<()> {
        let pipeline = Compose::from_json(
            r#"[
                { "type": "random_horizontal_flip", "p": 1.0, "policy": "reverse_fields" },
                { "type": "random_rotation", "degrees": 20.0, "fill": "edge" },
                { "type": "color_remap" },
                { "type": "grayscale3_channel" },
                { "type": "resize" }
            ]"#,
        )?;

        assert_eq!(pipeline.len(), 5);
        assert_eq!(
            pipeline.steps()[0],
            Augmentation::RandomHorizontalFlip(RandomHorizontalFlip::new(
                1.0,
                LabelFlipPolicy::ReverseFields
            )?)
        );
        assert_eq!(
            pipeline.steps()[1],
            Augmentation::RandomRotation(RandomRotation::new(20.0, 0.5)?.with_fill(RotationFill::Edge))
        );
        assert_eq!(pipeline.steps()[2], Augmentation::ColorRemap(ColorRemap::street_color()));
        assert_eq!(pipeline.steps()[4], Augmentation::Resize(Resize::model_input()));
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_invalid_step() {
        let err = Compose::from_json(r#"[{ "type": "random_vertical_flip", "p": 2.0 }]"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("position 0"));
        assert!(Compose::from_json(r#"[{ "type": "sharpen" }]"#).is_err());
        assert!(Compose::from_json(r#"[{ "type": "to_tensor" }]"#).is_err());
    }

    #[test]
    fn test_tensor_pipeline_from_json() -> Result<()> {
        let pipeline = Compose::tensor_pipeline_from_json(
            r#"[
                { "type": "random_horizontal_flip", "p": 1.0 },
                { "type": "resize", "width": 4, "height": 5 },
                { "type": "to_tensor" }
            ]"#,
        )?;

        let out = pipeline.apply(test_sample(), &mut StdRng::seed_from_u64(0))?;
        assert_eq!(out.image.shape(), &[3, 5, 4]);
        assert!(out.image.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(out.label.fields(), &[0.2, -0.4, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_tensor_pipeline_requires_trailing_to_tensor() {
        assert!(Compose::tensor_pipeline_from_json(r#"[{ "type": "resize" }]"#).is_err());
        assert!(Compose::tensor_pipeline_from_json("[]").is_err());

        let err = Compose::tensor_pipeline_from_json(
            r#"[{ "type": "to_tensor" }, { "type": "resize" }, { "type": "to_tensor" }]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("position 0"));
    }
}
