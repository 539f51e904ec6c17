//! Affine bijector options: construction-time configuration.
//!
//! Purpose
//! -------
//! Collect the knobs of [`AffineLinearOperator`](crate::bijectors::affine::AffineLinearOperator)
//! in one value so call sites pass explicit settings rather than loose
//! booleans.
//!
//! Conventions
//! -----------
//! - `validate_args` turns on eager checks (non-singular, finite scale and
//!   finite shift) at construction; shape checks always run.
//! - `verbose` only has an effect with the `obs_slog` feature, where it
//!   emits a construction record on the terminal logger.

/// Name reported by affine bijectors unless overridden.
pub const DEFAULT_AFFINE_NAME: &str = "affine_linear_operator";

/// AffineOptions: configuration for affine bijectors.
///
/// Fields
/// ------
/// - `validate_args`: `bool`
///   Reject singular or non-finite scales and non-finite shifts at
///   construction.
/// - `adjoint`: `bool`
///   Use the adjoint (transpose) of the scale in both directions.
/// - `name`: `String`
///   Name reported by [`Bijector::name`](crate::bijectors::traits::Bijector::name).
/// - `verbose`: `bool`
///   Emit construction diagnostics when the `obs_slog` feature is enabled.
///
/// Notes
/// -----
/// - `Default` gives `validate_args = false`, `adjoint = false`,
///   `name = "affine_linear_operator"`, `verbose = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineOptions {
    pub validate_args: bool,
    pub adjoint: bool,
    pub name: String,
    pub verbose: bool,
}

impl AffineOptions {
    /// Construct options from explicit settings; `name = None` keeps
    /// [`DEFAULT_AFFINE_NAME`].
    pub fn new(validate_args: bool, adjoint: bool, name: Option<&str>, verbose: bool) -> Self {
        AffineOptions {
            validate_args,
            adjoint,
            name: name.unwrap_or(DEFAULT_AFFINE_NAME).to_string(),
            verbose,
        }
    }

    /// Default options with argument validation switched on.
    pub fn validated() -> Self {
        AffineOptions { validate_args: true, ..AffineOptions::default() }
    }
}

impl Default for AffineOptions {
    fn default() -> Self {
        AffineOptions::new(false, false, None, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify the documented defaults.
    //
    // Given
    // -----
    // - `AffineOptions::default()`.
    //
    // Expect
    // ------
    // - No validation, no adjoint, default name, quiet.
    fn default_matches_documented_values() {
        let opts = AffineOptions::default();
        assert!(!opts.validate_args);
        assert!(!opts.adjoint);
        assert_eq!(opts.name, DEFAULT_AFFINE_NAME);
        assert!(!opts.verbose);
    }

    #[test]
    // Purpose
    // -------
    // `new` keeps explicit values and `validated` only flips validation.
    //
    // Given
    // -----
    // - A custom name with adjoint on; then `AffineOptions::validated()`.
    //
    // Expect
    // ------
    // - Fields are stored verbatim; `validated` differs from default only
    //   in `validate_args`.
    fn new_and_validated_preserve_fields() {
        let opts = AffineOptions::new(false, true, Some("whiten"), true);
        assert!(opts.adjoint);
        assert!(opts.verbose);
        assert_eq!(opts.name, "whiten");

        let validated = AffineOptions::validated();
        assert_eq!(validated, AffineOptions { validate_args: true, ..AffineOptions::default() });
    }
}
