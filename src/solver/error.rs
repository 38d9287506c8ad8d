//! Solver error type

use thiserror::Error;

use crate::expression::ExpressionError;

/// Everything that can stop a solve
///
/// Errors are never retried: the first failure aborts the solve and is
/// returned to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Inconsistent configuration, coefficients or initial condition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure while evaluating the right-hand side or its Jacobian
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// Newton iteration exhausted its budget
    #[error("Newton iteration did not converge at t = {time} after {iterations} iterations (last correction {correction:e})")]
    NonConvergence {
        time: f64,
        iterations: usize,
        correction: f64,
    },

    /// Newton matrix could not be factorized
    #[error("singular Newton matrix at t = {time}")]
    SingularJacobian { time: f64 },

    /// NaN or Inf produced in a column
    #[error("non-finite value in column {column} (t = {time}); try a smaller step size")]
    NonFinite { column: usize, time: f64 },
}

impl SolverError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SolverError::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_errors_convert() {
        let error: SolverError = ExpressionError::InvalidEntry { code: "abc".to_string() }.into();
        assert_eq!(error.to_string(), "invalid expression entry `abc`");
    }

    #[test]
    fn test_messages() {
        let error = SolverError::NonConvergence { time: 0.5, iterations: 100, correction: 1e-2 };
        assert!(error.to_string().contains("after 100 iterations"));
        assert_eq!(SolverError::invalid("step").to_string(), "invalid argument: step");
    }
}
