//! linalg: batched linear operators used as affine scales.
//!
//! Purpose
//! -------
//! Provide the small slice of linear algebra an affine bijector needs:
//! matrix–vector products, linear solves, and log-absolute-determinants
//! for structured square matrices, all batched with NumPy broadcasting.
//!
//! Key behaviors
//! -------------
//! - [`LinearOperator`] is the abstraction every scale implements.
//! - Concrete operators: [`Identity`], [`ScaledIdentity`], [`Diag`], and
//!   [`LowerTriangular`]; [`ScaleOperator`] wraps them for runtime choice.
//! - [`broadcast`] lines operator batches up with input batches.
//! - Failures are reported through [`LinOpError`] / [`LinOpResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Storage is `f64`, real-valued, and immutable after construction.
//! - Inputs carry the vector axis last: `[X..., n]`.
//! - Operators never check finiteness or invertibility unless asked to via
//!   [`LinearOperator::assert_non_singular`]; solves still refuse an exactly
//!   zero diagonal.
//!
//! Conventions
//! -----------
//! - Operator storage is `ndarray::ArrayD<f64>`; per-member triangular
//!   algebra runs on `nalgebra` matrices.
//! - This module never logs and performs no I/O.
//!
//! Testing notes
//! -------------
//! - Each operator module carries unit tests for products, solves,
//!   log-determinants, broadcasting, and singularity reporting.

pub mod broadcast;
pub mod diag;
pub mod errors;
pub mod identity;
pub mod lower_triangular;
pub mod operator;
pub mod scale;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::diag::Diag;
pub use self::errors::{LinOpError, LinOpResult};
pub use self::identity::{Identity, ScaledIdentity};
pub use self::lower_triangular::LowerTriangular;
pub use self::operator::LinearOperator;
pub use self::scale::ScaleOperator;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_bijectors::linalg::prelude::*;
//
// to import the operator surface in a single line.

pub mod prelude {
    pub use super::diag::Diag;
    pub use super::errors::{LinOpError, LinOpResult};
    pub use super::identity::{Identity, ScaledIdentity};
    pub use super::lower_triangular::LowerTriangular;
    pub use super::operator::LinearOperator;
    pub use super::scale::ScaleOperator;
}
