//! Distributions: densities of bijector-transformed random vectors.
//!
//! [`TransformedNormal`] pushes an iid normal base through any
//! [`Bijector`](crate::bijectors::Bijector) and evaluates `log_prob` / `prob`
//! by the change-of-variables formula. Errors are [`DistributionError`].

pub mod errors;
pub mod transformed;

pub use self::errors::{DistributionError, DistributionResult};
pub use self::transformed::TransformedNormal;
