//! Error types for the crop-protection-analysis crate.
use thiserror::Error;

/// Error type for the crate.
///
/// Every failure is reported before any computation proceeds, nothing is partially computed and
/// no default is ever substituted.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum AnalysisError {
    /// Malformed or out of range input data, e.g. humidity outside [0, 100], an empty or
    /// unordered observation sequence, or negative wind.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The requested disease has no registered profile and no default profile was supplied.
    #[error("No profile available for disease '{0}'.")]
    UnknownDisease(String),
    /// Thresholds, weights, or a configuration document are internally inconsistent.
    #[error("Inconsistent configuration: {0}")]
    ConfigurationError(String),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn invalid_input<S: Into<String>>(msg: S) -> Self {
        AnalysisError::InvalidInput(msg.into())
    }

    pub(crate) fn configuration<S: Into<String>>(msg: S) -> Self {
        AnalysisError::ConfigurationError(msg.into())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::ConfigurationError(err.to_string())
    }
}
