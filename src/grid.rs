//! Launch-geometry model for the layout kernels.
//!
//! Kernels iterate a three-axis grid: thread ids along the innermost
//! dimension, rows of the higher dimensions, and batch members. The two
//! outer axes are capped by [`MAX_GRID_EXTENT`]; exceeding the cap is a
//! configuration error reported before any element access.

use crate::descriptor::LayoutError;

/// Threads per block along the innermost axis.
pub const BLOCK_SIZE: usize = 512;

/// Maximum extent of the batch and higher-dimension grid axes.
pub const MAX_GRID_EXTENT: usize = 65_535;

/// Resolved launch geometry for one kernel invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Samples per row along the innermost axis.
    pub samples: usize,
    /// Blocks covering the innermost axis.
    pub blocks: usize,
    pub threads_per_block: usize,
    /// Rows per batch member (product of higher dimensions).
    pub high: usize,
    pub batch: usize,
}

impl Grid {
    /// Geometry covering `samples` elements per row over `high` rows and
    /// `batch` members. Fails with `GridLimitExceeded` when either outer
    /// axis exceeds [`MAX_GRID_EXTENT`].
    pub fn for_samples(samples: usize, high: usize, batch: usize) -> Result<Self, LayoutError> {
        if samples == 0 || high == 0 || batch == 0 {
            return Err(LayoutError::InvalidValue);
        }
        if high > MAX_GRID_EXTENT || batch > MAX_GRID_EXTENT {
            return Err(LayoutError::GridLimitExceeded);
        }
        Ok(Self {
            samples,
            blocks: samples.div_ceil(BLOCK_SIZE),
            threads_per_block: BLOCK_SIZE,
            high,
            batch,
        })
    }

    /// All `(batch, high)` row tiles, batch-major.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize)> {
        let high = self.high;
        (0..self.batch).flat_map(move |b| (0..high).map(move |h| (b, h)))
    }
}
