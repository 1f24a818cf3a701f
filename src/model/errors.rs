//! Errors for mixed-response latent models (data validation, density domain
//! checks, quadrature configuration, and covariance restriction handling).
//!
//! This module defines a model error type, [`ModelError`], and a parameter
//! error type, [`ParamError`], used across the public fitting API and the
//! internal core. Both implement `Display`/`Error` and convert into the
//! optimizer-layer [`OptError`](crate::optimization::errors::OptError).
//!
//! ## Conventions
//! - **Indices are 0-based** (matrix row/column positions as stored).
//! - Dispersions must be **strictly positive and finite**; Bernoulli
//!   coordinates must carry dispersion exactly 1.
//! - Restriction matrices describe the latent covariance Σ entry-by-entry;
//!   symmetry violations and infeasible fixed patterns are configuration
//!   errors, caught before any optimization runs.

/// Crate-wide result alias for model operations that may produce
/// [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Result alias for covariance-map construction/evaluation paths that may
/// produce [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for mixed-model configuration and evaluation.
///
/// Covers input/data validation, density domain checks, quadrature
/// configuration, and fit-state errors. Implements `Display`/`Error` and
/// converts into [`OptError`](crate::optimization::errors::OptError) at the
/// optimizer boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Input/data validation ----
    /// Response matrix has zero rows or zero columns.
    EmptyData,

    /// Number of response columns disagrees with the number of type labels.
    ResponseColumnMismatch { expected: usize, actual: usize },

    /// Stacked design matrix row count disagrees with `n_obs * n_responses`.
    DesignRowMismatch { expected: usize, actual: usize },

    /// Dispersion vector length disagrees with the number of responses.
    DispersionLengthMismatch { expected: usize, actual: usize },

    /// A response entry is NaN/±inf.
    NonFiniteResponse { row: usize, col: usize, value: f64 },

    /// A design entry is NaN/±inf.
    NonFiniteDesign { row: usize, col: usize, value: f64 },

    /// A dispersion entry is non-finite or ≤ 0.
    InvalidDispersion { index: usize, value: f64 },

    /// A Bernoulli coordinate's dispersion is not exactly 1.
    BernoulliDispersion { index: usize, value: f64 },

    /// A Bernoulli response entry is outside {0, 1}.
    InvalidBernoulliResponse { row: usize, col: usize, value: f64 },

    /// A Poisson response entry is not a finite nonnegative integer.
    InvalidPoissonResponse { row: usize, col: usize, value: f64 },

    // ---- Density domain checks ----
    /// Density evaluation received a non-finite or ≤ 0 dispersion.
    InvalidPsi { value: f64 },

    /// Density evaluation received a response outside the family's support.
    InvalidDensityInput { value: f64, reason: &'static str },

    // ---- Quadrature / model configuration ----
    /// Quadrature grid requested with zero latent dimensions.
    InvalidQuadratureDim { dim: usize },

    /// Quadrature grid requested with zero nodes per dimension.
    InvalidNodeCount { nodes: usize },

    /// Coefficient count must be ≥ 1.
    InvalidCoefficientCount { n_coeffs: usize },

    /// Restriction matrix dimension disagrees with the number of responses.
    RestrictionDimMismatch { expected: usize, actual: usize },

    /// Data was built for a different response-type layout than the model.
    ResponseTypeMismatch { index: usize },

    /// Data coefficient count disagrees with the model's.
    CoefficientCountMismatch { expected: usize, actual: usize },

    // ---- Fit state ----
    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            ModelError::EmptyData => {
                write!(f, "Response matrix is empty.")
            }
            ModelError::ResponseColumnMismatch { expected, actual } => {
                write!(
                    f,
                    "Response matrix has {actual} columns but {expected} response types were given."
                )
            }
            ModelError::DesignRowMismatch { expected, actual } => {
                write!(
                    f,
                    "Stacked design matrix has {actual} rows; expected n_obs * n_responses = {expected}."
                )
            }
            ModelError::DispersionLengthMismatch { expected, actual } => {
                write!(f, "Dispersion vector has length {actual}; expected {expected}.")
            }
            ModelError::NonFiniteResponse { row, col, value } => {
                write!(f, "Response entry at ({row}, {col}) is non-finite: {value}")
            }
            ModelError::NonFiniteDesign { row, col, value } => {
                write!(f, "Design entry at ({row}, {col}) is non-finite: {value}")
            }
            ModelError::InvalidDispersion { index, value } => {
                write!(f, "Dispersion at index {index} must be finite and > 0; got: {value}")
            }
            ModelError::BernoulliDispersion { index, value } => {
                write!(
                    f,
                    "Bernoulli coordinate {index} must have dispersion exactly 1; got: {value}"
                )
            }
            ModelError::InvalidBernoulliResponse { row, col, value } => {
                write!(f, "Bernoulli response at ({row}, {col}) must be 0 or 1; got: {value}")
            }
            ModelError::InvalidPoissonResponse { row, col, value } => {
                write!(
                    f,
                    "Poisson response at ({row}, {col}) must be a finite nonnegative integer; got: {value}"
                )
            }
            // ---- Density domain checks ----
            ModelError::InvalidPsi { value } => {
                write!(f, "Density dispersion must be finite and > 0; got: {value}")
            }
            ModelError::InvalidDensityInput { value, reason } => {
                write!(f, "Density input {value} is outside the family's support. {reason}")
            }
            // ---- Quadrature / model configuration ----
            ModelError::InvalidQuadratureDim { dim } => {
                write!(f, "Quadrature dimension must be ≥ 1; got: {dim}")
            }
            ModelError::InvalidNodeCount { nodes } => {
                write!(f, "Quadrature nodes per dimension must be ≥ 1; got: {nodes}")
            }
            ModelError::InvalidCoefficientCount { n_coeffs } => {
                write!(f, "Coefficient count must be ≥ 1; got: {n_coeffs}")
            }
            ModelError::RestrictionDimMismatch { expected, actual } => {
                write!(
                    f,
                    "Restriction matrix is {actual}×{actual} but the model has {expected} responses."
                )
            }
            ModelError::ResponseTypeMismatch { index } => {
                write!(f, "Response type at index {index} disagrees between model and data.")
            }
            ModelError::CoefficientCountMismatch { expected, actual } => {
                write!(f, "Data carries {actual} coefficients; the model expects {expected}.")
            }
            // ---- Fit state ----
            ModelError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
        }
    }
}

/// Error type for covariance restriction matrices and the free-parameter map.
///
/// Produced when constructing a [`RestrictionMatrix`]
/// (crate::model::core::covariance::RestrictionMatrix) or when mapping
/// between the unconstrained optimizer slice and the symmetric matrix Σ.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    // ---- Restriction-matrix construction ----
    /// Restriction grid is not square.
    NotSquare { rows: usize, cols: usize },

    /// Fixed entries at (i, j) and (j, i) disagree.
    AsymmetricFixedEntry { row: usize, col: usize },

    /// One of (i, j)/(j, i) is fixed while its mirror is free.
    AsymmetricPattern { row: usize, col: usize },

    /// A fixed entry is NaN/±inf.
    NonFiniteFixedEntry { row: usize, col: usize, value: f64 },

    /// A fixed diagonal entry is ≤ 0.
    NonPositiveFixedVariance { index: usize, value: f64 },

    /// A Bernoulli coordinate's diagonal is not `Fixed(1.0)`.
    BernoulliVarianceNotFixed { index: usize },

    /// Restriction dimension disagrees with the response-type labels.
    TypeLengthMismatch { expected: usize, actual: usize },

    // ---- Free-parameter map evaluation ----
    /// Free-parameter slice length disagrees with the restriction pattern.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// A free-parameter entry is NaN/±inf.
    InvalidThetaInput { index: usize, value: f64 },

    /// Inverse map received a matrix whose diagonal is not strictly positive.
    NonPositiveDiagonal { index: usize, value: f64 },

    /// Inverse map received a matrix of the wrong dimension.
    SigmaDimMismatch { expected: usize, actual: usize },

    // ---- Factorization ----
    /// Candidate Σ is not positive definite (Cholesky failed).
    NotPositiveDefinite,

    /// The fixed pattern admits no positive definite completion at the
    /// identity start.
    InfeasibleRestriction,
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Restriction-matrix construction ----
            ParamError::NotSquare { rows, cols } => {
                write!(f, "Restriction matrix must be square; got {rows}×{cols}.")
            }
            ParamError::AsymmetricFixedEntry { row, col } => {
                write!(f, "Fixed entries at ({row}, {col}) and ({col}, {row}) disagree.")
            }
            ParamError::AsymmetricPattern { row, col } => {
                write!(
                    f,
                    "Entry ({row}, {col}) is fixed while ({col}, {row}) is free; the pattern must be symmetric."
                )
            }
            ParamError::NonFiniteFixedEntry { row, col, value } => {
                write!(f, "Fixed entry at ({row}, {col}) is non-finite: {value}")
            }
            ParamError::NonPositiveFixedVariance { index, value } => {
                write!(f, "Fixed variance at diagonal index {index} must be > 0; got: {value}")
            }
            ParamError::BernoulliVarianceNotFixed { index } => {
                write!(
                    f,
                    "Diagonal entry {index} belongs to a Bernoulli coordinate and must be Fixed(1.0)."
                )
            }
            ParamError::TypeLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Restriction matrix is {actual}×{actual} but {expected} response types were given."
                )
            }
            // ---- Free-parameter map evaluation ----
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Free covariance slice has length {actual}; expected {expected}.")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Free covariance parameter at index {index} is non-finite: {value}")
            }
            ParamError::NonPositiveDiagonal { index, value } => {
                write!(f, "Covariance diagonal at index {index} must be > 0; got: {value}")
            }
            ParamError::SigmaDimMismatch { expected, actual } => {
                write!(f, "Covariance matrix is {actual}×{actual}; expected {expected}×{expected}.")
            }
            // ---- Factorization ----
            ParamError::NotPositiveDefinite => {
                write!(f, "Latent covariance matrix is not positive definite.")
            }
            ParamError::InfeasibleRestriction => {
                write!(
                    f,
                    "Fixed restriction pattern admits no positive definite covariance at the identity start."
                )
            }
        }
    }
}
