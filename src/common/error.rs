//! Error types for highway_planner

use std::fmt;

/// Main error type for the planning core
#[derive(Debug)]
pub enum PlannerError {
    /// Reference path table is empty or malformed at load time
    InvalidMap(String),
    /// Invalid configuration or session parameter
    InvalidParameter(String),
    /// Malformed per-cycle snapshot; the cycle is skipped
    InvalidSnapshot(String),
    /// Numerical computation failed (matrix inversion, spline domain, etc.)
    NumericalError(String),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidMap(msg) => write!(f, "Invalid map: {}", msg),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::InvalidSnapshot(msg) => write!(f, "Invalid snapshot: {}", msg),
            PlannerError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PlannerError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planning operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::InvalidMap("reference path needs at least 2 waypoints".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid map: reference path needs at least 2 waypoints"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(PlannerError::NumericalError("singular system".to_string()));
        assert!(err.to_string().contains("singular"));
    }
}
