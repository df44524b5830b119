//! Label-aware image augmentation and dataset indexing for steering-action models.
//!
//! ```text
//! CarDataset::get(i) ─> LoadImage + parse_label ─> Compose ─> LabeledImage ─> ToTensor
//! ```

pub mod dataset;
pub mod error;
pub mod label;
pub mod readers;
pub mod sample;
pub mod transforms;

pub use dataset::{CarDataset, DatasetConfig};
pub use error::{DatasetError, LabelError};
pub use label::{parse_label, Label, LabelFlipPolicy};
pub use sample::{LabeledImage, LabeledSample, LabeledTensor};
pub use transforms::{Augmentation, AugmentationConfig, Compose, Transform};
