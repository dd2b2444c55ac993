use thiserror::Error;

/// Simplified `Result` using [`EstimatorError`] as error type
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Coarse classification of an [`EstimatorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NonConvergence,
    DimensionMismatch,
    Numerical,
}

/// Error variants from hyperparameter construction, data preparation or model
/// estimation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("invalid alpha {0}")]
    InvalidRegularization(f32),
    #[error("invalid tolerance {0}")]
    InvalidTolerance(f32),
    #[error("invalid K {0}")]
    InvalidK(usize),
    #[error("invalid maximum number of iterations {0}")]
    InvalidMaxIterations(usize),
    #[error("invalid degree {0}, must be at least 1")]
    InvalidDegree(usize),
    #[error("invalid number of knots {0}, must be at least 2")]
    InvalidKnots(usize),
    #[error("invalid test fraction {0}, must lie in (0, 1)")]
    InvalidTestFraction(f32),
    #[error("test fraction {fraction} leaves an empty split for {n_samples} samples")]
    EmptySplit { fraction: f32, n_samples: usize },
    #[error("invalid variance fraction {0}, must lie in (0, 1]")]
    InvalidVarianceFraction(f32),
    #[error("cannot select {requested} features out of {available}")]
    InvalidFeatureCount { requested: usize, available: usize },
    #[error("cannot build {n_folds} folds out of {n_samples} samples")]
    InvalidFolds { n_folds: usize, n_samples: usize },
    #[error("feature set is empty")]
    EmptyFeatureSet,
    #[error("dataset has no samples")]
    EmptyDataset,
    #[error("column {0} appears more than once")]
    DuplicateColumn(String),
    #[error("unknown column {0}")]
    UnknownColumn(String),
    #[error("column {0} holds a non-finite value")]
    NonFiniteValue(String),
    #[error("input has zero total variance")]
    ZeroVariance,
    #[error("{what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("solver did not converge after {0} epochs")]
    NonConvergence(usize),
    #[error("singular system")]
    SingularMatrix,
    #[error("non-finite intermediate values in {0}")]
    NonFiniteResult(&'static str),
}

impl EstimatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimatorError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            EstimatorError::NonConvergence(_) => ErrorKind::NonConvergence,
            EstimatorError::SingularMatrix | EstimatorError::NonFiniteResult(_) => {
                ErrorKind::Numerical
            }
            _ => ErrorKind::InvalidArgument,
        }
    }
}
