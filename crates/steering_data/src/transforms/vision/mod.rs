//! src/transforms/vision/mod.rs
//!
//! Label-aware vision transforms for image augmentation.
//!
//! Every transform here maps a [`LabeledImage`](crate::sample::LabeledImage)
//! to a new sample and keeps the label consistent with the image: only the
//! horizontal flip touches the label, all others pass it through.
//!
//! # Module Organization
//!
//! ```text
//! transforms/vision/
//! ├── geometric.rs     → Spatial transformations (resize, rotate)
//! ├── augmentation.rs  → Random flips (horizontal flip rewrites the label)
//! ├── photometric.rs   → Colour changes (street colour remap, grayscale)
//! ├── conversion.rs    → Format conversions (image → tensor)
//! └── io.rs            → Image loading
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::transforms::Transform;
//! use crate::transforms::vision::{Resize, RandomHorizontalFlip, ToTensor};
//!
//! let pipeline = Resize::model_input()
//!     .then(RandomHorizontalFlip::new(0.5, LabelFlipPolicy::SwapTurnIndicators)?)
//!     .then(ToTensor);
//! let tensor_sample = pipeline.apply(sample, &mut rng)?;
//! ```

pub mod augmentation;
pub mod conversion;
pub mod geometric;
pub mod io;
pub mod photometric;

pub use augmentation::{RandomHorizontalFlip, RandomVerticalFlip};
pub use conversion::ToTensor;
pub use geometric::{RandomRotation, Resize, RotationFill, TARGET_SIZE};
pub use io::LoadImage;
pub use photometric::{ColorRemap, Grayscale3Channel};
