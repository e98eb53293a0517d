//! Crate error type.

use thiserror::Error;

/// Errors raised while building instances, solving, or replaying tours.
///
/// Hitting the exact solver's time limit with a feasible incumbent is not an
/// error: the returned [`Solution`](crate::models::Solution) is flagged
/// [`SolveStatus::TimeLimited`](crate::models::SolveStatus::TimeLimited).
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Malformed input, rejected before any solving attempt.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// No solution exists for the given capacity and vehicle count.
    #[error("infeasible instance: {0}")]
    InfeasibleInstance(String),
    /// A solution handed to the tour builder violates coverage invariants.
    #[error("corrupt solution: {0}")]
    CorruptSolution(String),
    /// The search stopped before finding any feasible solution.
    #[error("unsolved: {0}")]
    Unsolved(String),
    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

impl RoutingError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::InfeasibleInstance(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptSolution(message.into())
    }

    pub fn unsolved(message: impl Into<String>) -> Self {
        Self::Unsolved(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RoutingError::invalid_parameter("capacity must be positive").to_string(),
            "invalid parameter: capacity must be positive"
        );
        assert_eq!(
            RoutingError::infeasible("demand 30 exceeds capacity 20").to_string(),
            "infeasible instance: demand 30 exceeds capacity 20"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("not json").expect_err("must fail");
        let err: RoutingError = err.into();
        assert!(matches!(err, RoutingError::Config(_)));
    }
}
