use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning raw action text into a [`Label`](crate::label::Label),
/// or while applying a label-aware transform.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LabelError {
    #[error("action text {text:?} contains no numeric fields")]
    NoNumericFields { text: String },

    #[error("numeric token {token:?} could not be converted to a float")]
    InvalidNumber { token: String },

    #[error("label has {found} fields, turn indicators need at least 4")]
    MissingTurnFields { found: usize },
}

/// Errors surfaced by [`CarDataset`](crate::dataset::CarDataset).
///
/// Every failure is returned to the immediate caller; rows are never skipped,
/// so batch and label alignment downstream stays intact.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to decode image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse label of {filename:?}")]
    Parse {
        filename: String,
        #[source]
        source: LabelError,
    },

    #[error("label of {filename:?} has {found} fields, expected {expected}")]
    FieldCount {
        filename: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid label table {}: {message}", path.display())]
    Table { path: PathBuf, message: String },

    #[error("transform pipeline failed on sample {index}")]
    Transform {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl DatasetError {
    /// Whether this error belongs to the out-of-range class.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, DatasetError::IndexOutOfRange { .. })
    }
}
