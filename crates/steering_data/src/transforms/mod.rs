pub mod compose;
pub mod core;
pub mod vision;

pub use compose::{Augmentation, AugmentationConfig, Compose, TensorPipeline};
pub use core::{Chain, Transform};
