//! Error types for opchain.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Name the operator that failed
//! - Separate caller mistakes (preconditions) from operator failures
//! - Pass through the chain executor unchanged

use thiserror::Error;

/// Top-level error type for opchain.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum OpchainError {
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

/// Errors raised by the matrix container itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Data length mismatch: expected {expected} samples, got {got}")]
    DataLength { expected: usize, got: usize },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("Matrix of {rows}x{cols} exceeds the image size limit")]
    TooLarge { rows: usize, cols: usize },
}

/// Errors raised while applying an operator to a matrix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    #[error("Operator '{operator}' received an empty source matrix")]
    EmptySource { operator: String },

    #[error("Invalid argument for operator '{operator}': {reason}")]
    InvalidArgument { operator: String, reason: String },

    #[error("Operator '{operator}' does not support {channels}-channel matrices")]
    UnsupportedChannels { operator: String, channels: usize },

    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Operator '{operator}' failed: {reason}")]
    Failed { operator: String, reason: String },
}

/// Errors from pipeline configuration and the operator registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Missing parameter '{parameter}' for operator '{operator}'")]
    MissingParameter { operator: String, parameter: String },

    #[error("Invalid parameter '{parameter}' for operator '{operator}': {reason}")]
    InvalidParameter {
        operator: String,
        parameter: String,
        reason: String,
    },

    #[error("Pipeline has no steps")]
    EmptyPipeline,

    #[error("Invalid step '{0}'")]
    InvalidStep(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OperatorError {
    /// Build an [`OperatorError::EmptySource`] for the named operator.
    pub fn empty_source(operator: impl Into<String>) -> Self {
        OperatorError::EmptySource {
            operator: operator.into(),
        }
    }

    /// Build an [`OperatorError::InvalidArgument`] for the named operator.
    pub fn invalid_argument(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        OperatorError::InvalidArgument {
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a caller mistake rather than an operator failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OperatorError::EmptySource { .. } | OperatorError::InvalidArgument { .. }
        )
    }

    /// Get the name of the operator that raised this error, if known.
    pub fn operator(&self) -> Option<&str> {
        match self {
            OperatorError::EmptySource { operator }
            | OperatorError::InvalidArgument { operator, .. }
            | OperatorError::UnsupportedChannels { operator, .. }
            | OperatorError::Failed { operator, .. } => Some(operator),
            OperatorError::Matrix(_) => None,
        }
    }
}

impl ConfigError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ConfigError::UnknownOperator(id) => Some(format!(
                "Run `opchain list` to see the available operators ('{}' is not registered)",
                id
            )),
            ConfigError::MissingParameter { parameter, .. } => {
                Some(format!("Add '{}' to the step parameters", parameter))
            }
            ConfigError::EmptyPipeline => Some("Add at least one step".to_string()),
            _ => None,
        }
    }
}

/// Result type alias for opchain operations.
pub type OpchainResult<T> = Result<T, OpchainError>;

/// Result type alias for operator application.
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Result type alias for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;
