//! src/dataset/mod.rs
//!
//! Indexed access to a recorded driving dataset.
//!
//! ```text
//!   <root>/data_log.csv ──(eager, once)──> LabelTable (Arc<[LabelRecord]>)
//!                                              │ get(index)
//!                                              ↓
//!   <root>/images/<filename> ──(lazy, every get)──> LoadImage → RGB8
//!                                              │
//!                              parse_label(action) → Label
//!                                              │
//!                                   Compose (optional)
//!                                              ↓
//!                                        LabeledImage
//! ```
//!
//! Metadata is loaded once; pixels are decoded on every access and never
//! cached. The batching and shuffling loader lives outside this crate and
//! only needs `len()` and `get()`.

mod config;
mod split;

pub use config::{DatasetConfig, DatasetConfigBuilder};
pub use split::{split_indices, DatasetSplits, SplitFractions};

use crate::error::DatasetError;
use crate::label::{parse_label, Label};
use crate::readers::{LabelRecord, LabelTable};
use crate::sample::{LabeledImage, LabeledTensor};
use crate::transforms::vision::{LoadImage, ToTensor};
use crate::transforms::{Compose, Transform};
use rand::RngCore;
use std::path::{Path, PathBuf};

/// Image + action-label dataset backed by a directory of images and a CSV table.
///
/// # Example
/// ```ignore
/// let dataset = CarDataset::open(DatasetConfig::new("../../data"))?
///     .with_transform(Compose::training_augmentations()?);
///
/// let mut rng = StdRng::seed_from_u64(0);
/// for i in 0..dataset.len() {
///     let sample = dataset.get(i, &mut rng)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CarDataset {
    config: DatasetConfig,
    images_path: PathBuf,
    table: LabelTable,
    loader: LoadImage,
    transform: Option<Compose>,
}

impl CarDataset {
    /// Opens the dataset and reads the label table into memory.
    ///
    /// Fails with [`DatasetError::NotFound`] when the root, the image directory
    /// or the label table is missing.
    pub fn open(config: DatasetConfig) -> Result<Self, DatasetError> {
        let images_path = config.images_path();
        let labels_path = config.labels_path();

        require(config.root(), "dataset root", Path::is_dir)?;
        require(&images_path, "image directory", Path::is_dir)?;
        require(&labels_path, "label table", Path::is_file)?;

        let table = LabelTable::from_csv(
            &labels_path,
            &config.filename_column,
            &config.action_column,
        )?;

        Ok(Self {
            config,
            images_path,
            table,
            loader: LoadImage::new(),
            transform: None,
        })
    }

    /// Attaches an augmentation pipeline applied on every `get`.
    pub fn with_transform(mut self, transform: Compose) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn transform(&self) -> Option<&Compose> {
        self.transform.as_ref()
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Number of rows in the label table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The raw label-table row at `index`.
    pub fn record(&self, index: usize) -> Result<&LabelRecord, DatasetError> {
        self.table.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Full path of the image for `index`.
    pub fn image_path(&self, index: usize) -> Result<PathBuf, DatasetError> {
        Ok(self.images_path.join(&self.record(index)?.filename))
    }

    /// Parses the action text of `index` into a label of the configured width.
    pub fn label(&self, index: usize) -> Result<Label, DatasetError> {
        let record = self.record(index)?;
        let label = parse_label(&record.action).map_err(|source| DatasetError::Parse {
            filename: record.filename.clone(),
            source,
        })?;

        if label.len() != self.config.label_width {
            return Err(DatasetError::FieldCount {
                filename: record.filename.clone(),
                expected: self.config.label_width,
                found: label.len(),
            });
        }
        Ok(label)
    }

    /// Reads and decodes sample `index` without applying the pipeline.
    pub fn get_raw(&self, index: usize) -> Result<LabeledImage, DatasetError> {
        let path = self.image_path(index)?;
        let image = self
            .loader
            .load(&path)
            .map_err(|source| DatasetError::Decode {
                path: path.clone(),
                source,
            })?;
        let label = self.label(index)?;

        tracing::debug!(index, path = %path.display(), "loaded sample");
        Ok(LabeledImage::new(image, label))
    }

    /// Reads sample `index` from disk and applies the pipeline, if any.
    ///
    /// Random transforms draw from `rng`; pass a seeded generator for
    /// reproducible augmentation.
    pub fn get(&self, index: usize, rng: &mut dyn RngCore) -> Result<LabeledImage, DatasetError> {
        let sample = self.get_raw(index)?;
        match &self.transform {
            Some(transform) => transform
                .apply(sample, rng)
                .map_err(|source| DatasetError::Transform { index, source }),
            None => Ok(sample),
        }
    }

    /// [`get`](Self::get) followed by [`ToTensor`]: a `[3, H, W]` tensor in [0, 1].
    pub fn get_tensor(
        &self,
        index: usize,
        rng: &mut dyn RngCore,
    ) -> Result<LabeledTensor, DatasetError> {
        let sample = self.get(index, rng)?;
        ToTensor
            .apply(sample, rng)
            .map_err(|source| DatasetError::Transform { index, source })
    }
}

fn require(path: &Path, what: &'static str, exists: fn(&Path) -> bool) -> Result<(), DatasetError> {
    if exists(path) {
        Ok(())
    } else {
        Err(DatasetError::NotFound {
            what,
            path: path.to_path_buf(),
        })
    }
}
