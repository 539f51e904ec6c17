//! Bijectors: invertible maps with log-determinant Jacobians.
//!
//! Purpose
//! -------
//! Provide the [`Bijector`] abstraction and its affine implementation,
//! [`AffineLinearOperator`], which maps `x ↦ scale·x + shift` for any
//! linear operator from [`crate::linalg`].
//!
//! Key behaviors
//! -------------
//! - `forward` / `inverse` act on the trailing vector axis and broadcast
//!   over leading batch axes.
//! - `inverse_log_det_jacobian(y, event_ndims)` reduces the per-vector
//!   Jacobian over the extra event axes (see [`jacobian`]).
//! - [`numerical_log_det_jacobian`] cross-checks analytic Jacobians by
//!   central differences.
//!
//! Invariants & assumptions
//! ------------------------
//! - `forward_min_event_ndims() <= event_ndims <= input rank` for every
//!   Jacobian call; violations return [`BijectorError::InvalidEventNdims`].
//! - `forward_log_det_jacobian(x, k) == -inverse_log_det_jacobian(forward(x), k)`.
//!
//! Conventions
//! -----------
//! - All errors are [`BijectorError`]; operator failures are wrapped in
//!   [`BijectorError::LinOp`].
//! - Construction settings live in [`AffineOptions`].
//!
//! Downstream usage
//! ----------------
//! - Rust callers build an affine bijector and call the trait methods:
//!
//!     use rust_bijectors::bijectors::prelude::*;
//!
//! - The Python layer wraps `AffineLinearOperator<ScaleOperator>` so one
//!   class covers every scale kind.

pub mod affine;
pub mod errors;
pub mod jacobian;
pub mod numerical;
pub mod options;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::affine::AffineLinearOperator;
pub use self::errors::{BijectorError, BijectorResult};
pub use self::numerical::numerical_log_det_jacobian;
pub use self::options::{AffineOptions, DEFAULT_AFFINE_NAME};
pub use self::traits::Bijector;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::affine::AffineLinearOperator;
    pub use super::errors::{BijectorError, BijectorResult};
    pub use super::options::AffineOptions;
    pub use super::traits::Bijector;
}
