//! `ScaleOperator`: closed set of operators usable as an affine scale.
//!
//! Callers that pick the operator kind at runtime (the Python bindings, or
//! configuration-driven code) hold a `ScaleOperator` instead of a generic
//! `O: LinearOperator`. Every method forwards to the wrapped variant.
use crate::linalg::{
    diag::Diag,
    errors::LinOpResult,
    identity::{Identity, ScaledIdentity},
    lower_triangular::LowerTriangular,
    operator::LinearOperator,
};
use ndarray::{ArrayD, ArrayViewD};

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleOperator {
    Identity(Identity),
    ScaledIdentity(ScaledIdentity),
    Diag(Diag),
    LowerTriangular(LowerTriangular),
}

impl ScaleOperator {
    fn inner(&self) -> &dyn LinearOperator {
        match self {
            ScaleOperator::Identity(op) => op,
            ScaleOperator::ScaledIdentity(op) => op,
            ScaleOperator::Diag(op) => op,
            ScaleOperator::LowerTriangular(op) => op,
        }
    }
}

impl Default for ScaleOperator {
    fn default() -> Self {
        ScaleOperator::Identity(Identity::default())
    }
}

impl From<Identity> for ScaleOperator {
    fn from(op: Identity) -> Self {
        ScaleOperator::Identity(op)
    }
}

impl From<ScaledIdentity> for ScaleOperator {
    fn from(op: ScaledIdentity) -> Self {
        ScaleOperator::ScaledIdentity(op)
    }
}

impl From<Diag> for ScaleOperator {
    fn from(op: Diag) -> Self {
        ScaleOperator::Diag(op)
    }
}

impl From<LowerTriangular> for ScaleOperator {
    fn from(op: LowerTriangular) -> Self {
        ScaleOperator::LowerTriangular(op)
    }
}

impl LinearOperator for ScaleOperator {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn batch_shape(&self) -> &[usize] {
        self.inner().batch_shape()
    }

    fn num_rows(&self) -> Option<usize> {
        self.inner().num_rows()
    }

    fn matvec(&self, x: ArrayViewD<'_, f64>, adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        self.inner().matvec(x, adjoint)
    }

    fn solvevec(&self, rhs: ArrayViewD<'_, f64>, adjoint: bool) -> LinOpResult<ArrayD<f64>> {
        self.inner().solvevec(rhs, adjoint)
    }

    fn log_abs_determinant(&self) -> ArrayD<f64> {
        self.inner().log_abs_determinant()
    }

    fn assert_non_singular(&self) -> LinOpResult<()> {
        self.inner().assert_non_singular()
    }

    fn to_dense(&self) -> LinOpResult<ArrayD<f64>> {
        self.inner().to_dense()
    }
}
