//! src/dataset/config.rs
//!
//! Where a dataset lives on disk and how its label table is laid out.
//!
//! Example:
//! ```ignore
//! let config = DatasetConfig::builder("../../data")
//!     .images_dir("images")
//!     .labels_file("data_log.csv")
//!     .label_width(4)
//!     .build();
//! ```
//!
//! The defaults match the recorder's layout:
//! `<root>/images/<image_filename>` and `<root>/data_log.csv` with columns
//! `image_filename` and `action`.

use crate::label::LABEL_WIDTH;
use std::path::{Path, PathBuf};

/// Configuration for [`CarDataset`](super::CarDataset)
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    /// Dataset root directory
    pub root: PathBuf,
    /// Image directory, relative to `root`
    pub images_dir: PathBuf,
    /// Label table (CSV), relative to `root`
    pub labels_file: PathBuf,
    /// Column holding the image filename
    pub filename_column: String,
    /// Column holding the free-text action
    pub action_column: String,
    /// Number of numeric fields every parsed label must have
    pub label_width: usize,
}

impl DatasetConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images_dir: PathBuf::from("images"),
            labels_file: PathBuf::from("data_log.csv"),
            filename_column: "image_filename".to_string(),
            action_column: "action".to_string(),
            label_width: LABEL_WIDTH,
        }
    }

    pub fn builder(root: impl Into<PathBuf>) -> DatasetConfigBuilder {
        DatasetConfigBuilder {
            config: Self::new(root),
        }
    }

    pub fn images_path(&self) -> PathBuf {
        self.root.join(&self.images_dir)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.root.join(&self.labels_file)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Builder for DatasetConfig with method chaining
#[derive(Debug, Clone)]
pub struct DatasetConfigBuilder {
    config: DatasetConfig,
}

impl DatasetConfigBuilder {
    /// Set the image directory, relative to the root
    pub fn images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.images_dir = dir.into();
        self
    }

    /// Set the label table path, relative to the root
    pub fn labels_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config.labels_file = file.into();
        self
    }

    pub fn filename_column(mut self, column: impl Into<String>) -> Self {
        self.config.filename_column = column.into();
        self
    }

    pub fn action_column(mut self, column: impl Into<String>) -> Self {
        self.config.action_column = column.into();
        self
    }

    /// Set the expected number of label fields.
    pub fn label_width(mut self, width: usize) -> Self {
        self.config.label_width = width;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> DatasetConfig {
        self.config
    }
}
