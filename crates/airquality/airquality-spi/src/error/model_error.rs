//! Model error types
//!
//! Errors raised by a single time series model while fitting or forecasting.

use thiserror::Error;

/// Errors that can occur inside a time series model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Insufficient data points for the operation
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Model has not been fitted yet
    #[error("Model must be fitted before prediction")]
    NotFitted,

    /// Estimation diverged
    #[error("Estimation failed to converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Invalid time series data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_insufficient_data_message() {
        let error = ModelError::InsufficientData {
            required: 16,
            actual: 4,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient data: need at least 16 points, got 4"
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let error = ModelError::InvalidParameter {
            name: "p".to_string(),
            reason: "AR order must be <= 10".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'p': AR order must be <= 10"
        );
    }

    #[test]
    fn test_not_fitted_message() {
        assert_eq!(
            ModelError::NotFitted.to_string(),
            "Model must be fitted before prediction"
        );
    }

    #[test]
    fn test_convergence_failure_message() {
        let error = ModelError::ConvergenceFailure { iterations: 25 };
        assert_eq!(
            error.to_string(),
            "Estimation failed to converge after 25 iterations"
        );
    }

    #[test]
    fn test_numerical_and_invalid_data_messages() {
        let numerical = ModelError::NumericalError("singular design matrix".to_string());
        assert_eq!(numerical.to_string(), "Numerical error: singular design matrix");

        let invalid = ModelError::InvalidData("Data contains NaN or infinite values".to_string());
        assert_eq!(
            invalid.to_string(),
            "Invalid data: Data contains NaN or infinite values"
        );
    }

    #[test]
    fn test_error_is_std_error_without_source() {
        let error: Box<dyn Error> = Box::new(ModelError::NotFitted);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelError>();
    }
}
