//! bijectors::jacobian: event-rank checks and Jacobian reduction.
//!
//! Purpose
//! -------
//! A bijector computes its log-det-Jacobian on its minimum event rank. When
//! a caller asks for a larger `event_ndims`, the extra event axes of the
//! input hold independent copies of the transform, so their Jacobian terms
//! add up. This module tiles the per-event term over those axes and sums
//! them away.
//!
//! Key behaviors
//! -------------
//! - [`validate_event_ndims`] enforces `min_event_ndims <= event_ndims <= rank`.
//! - [`reduce_jacobian_over_event`] broadcasts the Jacobian term against
//!   `shape[rank - event_ndims .. rank - min_event_ndims]` and sums the
//!   trailing `event_ndims - min_event_ndims` axes.
//!
//! Conventions
//! -----------
//! - The Jacobian term keeps its own (operator) batch shape; it is not
//!   broadcast against the batch axes of the input, only against the extra
//!   event axes.
use crate::{
    bijectors::errors::{BijectorError, BijectorResult},
    linalg::{broadcast::broadcast_shapes, errors::LinOpError},
};
use ndarray::{ArrayD, Axis, IxDyn};

/// Check that `event_ndims` lies in `min_event_ndims ..= rank`.
pub fn validate_event_ndims(
    rank: usize, event_ndims: usize, min_event_ndims: usize,
) -> BijectorResult<()> {
    if event_ndims < min_event_ndims || event_ndims > rank {
        return Err(BijectorError::InvalidEventNdims { event_ndims, min_event_ndims, rank });
    }
    Ok(())
}

/// Sum a per-event Jacobian term over the extra event axes of `shape`.
///
/// # Arguments
/// - `jacobian`: term computed on `min_event_ndims`-rank events, shaped by
///   the bijector's own batch.
/// - `shape`: shape of the input the caller evaluated at.
/// - `min_event_ndims` / `event_ndims`: bijector minimum and requested
///   event rank.
///
/// # Errors
/// - [`BijectorError::InvalidEventNdims`] from [`validate_event_ndims`].
/// - [`BijectorError::LinOp`] wrapping `IncompatibleBatchShapes` when the
///   term cannot be tiled over the extra event axes.
pub fn reduce_jacobian_over_event(
    jacobian: ArrayD<f64>, shape: &[usize], min_event_ndims: usize, event_ndims: usize,
) -> BijectorResult<ArrayD<f64>> {
    let rank = shape.len();
    validate_event_ndims(rank, event_ndims, min_event_ndims)?;
    let extra = &shape[rank - event_ndims..rank - min_event_ndims];
    if extra.is_empty() {
        return Ok(jacobian);
    }
    let tiled_shape = broadcast_shapes(extra, jacobian.shape())?;
    let mut reduced = jacobian
        .broadcast(IxDyn(&tiled_shape))
        .ok_or_else(|| LinOpError::IncompatibleBatchShapes {
            left: jacobian.shape().to_vec(),
            right: tiled_shape.clone(),
        })?
        .to_owned();
    for _ in 0..extra.len() {
        let last = reduced.ndim() - 1;
        reduced = reduced.sum_axis(Axis(last));
    }
    Ok(reduced)
}
