use thiserror::Error;

#[cfg(feature = "validation")]
use crate::validation::ValidationReport;

#[derive(Debug, Error)]
pub enum ProFormaError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[cfg(feature = "validation")]
    #[error("Assumptions failed validation: {}", .report.summary())]
    ValidationFailed { report: ValidationReport },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (last estimate: {last_estimate})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_estimate: f64,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProFormaError {
    fn from(e: serde_json::Error) -> Self {
        ProFormaError::SerializationError(e.to_string())
    }
}
