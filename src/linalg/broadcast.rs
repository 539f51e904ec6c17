//! linalg::broadcast: right-aligned batch broadcasting for operator storage.
//!
//! Purpose
//! -------
//! Linear operators and their inputs both carry *batch* axes in front of
//! their *core* axes (`[n]` for vectors and diagonals, `[n, n]` for
//! matrices). This module lines those batch axes up with NumPy rules and
//! flattens every batch member into one row of an `Array2`, so operator
//! kernels only ever loop over rows.
//!
//! Conventions
//! -----------
//! - Shapes are aligned from the right; missing leading axes count as 1 and
//!   size-1 axes stretch. Anything else is
//!   [`LinOpError::IncompatibleBatchShapes`].
//! - Flattened rows follow logical (row-major) order of the broadcast batch
//!   shape, and within a row the core axes are row-major too.
//! - Every helper copies into standard layout; callers may pass views with
//!   arbitrary strides.
use crate::linalg::errors::{LinOpError, LinOpResult};
use ndarray::{Array2, ArrayD, ArrayViewD, IxDyn};

/// Broadcast two shapes with NumPy semantics.
///
/// # Errors
/// - [`LinOpError::IncompatibleBatchShapes`] when an aligned pair of axes
///   differs and neither is 1.
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> LinOpResult<Vec<usize>> {
    let rank = left.len().max(right.len());
    let left_pad = rank - left.len();
    let right_pad = rank - right.len();
    let mut out = Vec::with_capacity(rank);
    for k in 0..rank {
        let l = if k < left_pad { 1 } else { left[k - left_pad] };
        let r = if k < right_pad { 1 } else { right[k - right_pad] };
        let dim = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(LinOpError::IncompatibleBatchShapes {
                    left: left.to_vec(),
                    right: right.to_vec(),
                });
            }
        };
        out.push(dim);
    }
    Ok(out)
}

/// Split `shape` into `(batch, core)` where `core` holds the trailing
/// `core_rank` axes.
///
/// Callers guarantee `shape.len() >= core_rank`.
pub fn split_batch(shape: &[usize], core_rank: usize) -> (&[usize], &[usize]) {
    shape.split_at(shape.len() - core_rank)
}

/// Broadcast `array` to `batch + core` and copy it into a
/// `(prod(batch), prod(core))` row matrix.
///
/// # Errors
/// - [`LinOpError::IncompatibleBatchShapes`] if `array` cannot be
///   broadcast to the target shape.
pub fn flatten_rows(
    array: ArrayViewD<'_, f64>, batch: &[usize], core: &[usize],
) -> LinOpResult<Array2<f64>> {
    let mut target = batch.to_vec();
    target.extend_from_slice(core);
    let view = array.broadcast(IxDyn(&target)).ok_or_else(|| {
        LinOpError::IncompatibleBatchShapes { left: array.shape().to_vec(), right: target.clone() }
    })?;
    let rows: usize = batch.iter().product();
    let cols: usize = core.iter().product();
    let data: Vec<f64> = view.iter().copied().collect();
    Ok(Array2::from_shape_vec((rows, cols), data)?)
}

/// Inverse of [`flatten_rows`]: reshape a row matrix back to `batch + core`.
pub fn unflatten_rows(rows: Array2<f64>, batch: &[usize], core: &[usize]) -> LinOpResult<ArrayD<f64>> {
    let mut target = batch.to_vec();
    target.extend_from_slice(core);
    let data: Vec<f64> = rows.iter().copied().collect();
    Ok(ArrayD::from_shape_vec(IxDyn(&target), data)?)
}
