//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;

/// Returned from [`Basis`][crate::basis::Basis] constructors and
/// transform-operator construction.
#[derive(Debug, Error)]
pub enum BasisError {
    /// Returned when a basis range is empty or holds fewer than 2 points.
    #[error("basis ranges require max > min and at least 2 points; got [{0}, {1}] with {2} points")]
    InvalidRange(f64, f64, usize),

    /// Returned when an operation requires a basis of the other kind.
    #[error("operation requires a {0} basis")]
    InvalidKind(&'static str),

    /// Returned when two bases do not form a conjugate position/momentum pair
    /// of equal size.
    #[error("bases do not form a conjugate position/momentum pair")]
    Incompatible,
}

impl BasisError {
    pub(crate) fn check_range(min: f64, max: f64, n: usize)
        -> Result<(), Self>
    {
        (max > min && n >= 2).then_some(())
            .ok_or(Self::InvalidRange(min, max, n))
    }
}

/// Returned from operator constructors and from
/// [`Operator::apply`][crate::operator::Operator::apply].
#[derive(Debug, Error)]
pub enum OperatorError {
    /// Returned when operators defined on different bases are combined.
    #[error("operators are defined on incompatible bases")]
    IncompatibleBasis,

    /// Returned when an operator meets a state vector (or a composite stage)
    /// of the wrong length.
    #[error("dimension mismatch; expected {0}, got {1}")]
    DimensionMismatch(usize, usize),

    /// Returned when a deferred sum or product is built from no operators.
    #[error("composite operators require at least one operand")]
    EmptyComposite,

    /// [`BasisError`]
    #[error("basis error: {0}")]
    Basis(#[from] BasisError),
}

impl OperatorError {
    pub(crate) fn check_dim(expected: usize, got: usize) -> Result<(), Self> {
        (expected == got).then_some(())
            .ok_or(Self::DimensionMismatch(expected, got))
    }
}

/// Returned from state constructors and measurement functions.
#[derive(Debug, Error)]
pub enum StateError {
    /// Returned when a wave packet is requested in a non-position basis.
    #[error("wave packets are constructed in a position basis")]
    NotPositionBasis,

    /// Returned when a non-positive wave packet width is encountered.
    #[error("wave packet widths must be greater than 0; got {0}")]
    BadWidth(f64),

    /// Returned when every sample of a wave packet underflows to zero on the
    /// basis grid.
    #[error("wave packet has no support on the basis grid")]
    NoSupport,

    /// [`OperatorError`]
    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),
}

/// Returned from time evolution functions.
#[derive(Debug, Error)]
pub enum EvolveError {
    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when requested sample times are not strictly increasing.
    #[error("sample times must be strictly increasing")]
    NonMonotonicTimes,

    /// Returned when fewer than two sample times are requested.
    #[error("time evolution requires at least 2 sample times; got {0}")]
    TooFewTimes(usize),

    /// Returned when the adaptive step size collapses before the next sample
    /// time is reached.
    #[error("adaptive step size collapsed near t = {0:.6e}")]
    StepSizeUnderflow(f64),

    /// Returned when the state norm drifts beyond tolerance, indicating a
    /// non-Hermitian generator.
    #[error("norm drifted by {0:.3e} at t = {1:.6e}; generator is not Hermitian to tolerance")]
    NonHermitian(f64, f64),

    /// [`OperatorError`]
    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),
}

impl EvolveError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }
}
