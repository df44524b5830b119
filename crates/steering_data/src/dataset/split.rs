use anyhow::{ensure, Result};
use std::ops::Range;

/// Fractions of a dataset assigned to training and validation; the rest is test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitFractions {
    pub train: f64,
    pub val: f64,
}

impl Default for SplitFractions {
    /// 60% train, 20% validation, 20% test.
    fn default() -> Self {
        Self {
            train: 0.6,
            val: 0.2,
        }
    }
}

/// Contiguous, non-overlapping index ranges covering `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSplits {
    pub train: Range<usize>,
    pub val: Range<usize>,
    pub test: Range<usize>,
}

/// Splits `0..len` sequentially: train first, then validation, then test.
///
/// Sizes are truncated (`floor(len * fraction)`), so the test range absorbs
/// any remainder.
pub fn split_indices(len: usize, fractions: SplitFractions) -> Result<DatasetSplits> {
    let SplitFractions { train, val } = fractions;
    ensure!(
        (0.0..=1.0).contains(&train) && (0.0..=1.0).contains(&val),
        "Split fractions must be in [0.0, 1.0] (got train={}, val={})",
        train,
        val
    );
    ensure!(
        train + val <= 1.0,
        "Train and validation fractions exceed 1.0 (got {} + {})",
        train,
        val
    );

    let train_len = (len as f64 * train) as usize;
    let val_len = ((len as f64 * val) as usize).min(len - train_len);
    let val_end = train_len + val_len;

    Ok(DatasetSplits {
        train: 0..train_len,
        val: train_len..val_end,
        test: val_end..len,
    })
}
