//! Error types for the front-tracking solver
//!
//! Every fallible operation in the crate returns [`SimResult`]. The variants map to
//! the distinct ways a run can go wrong: bad input, broken front geometry, a marker
//! escaping the grid, or an elliptic solve that ran out of iterations.

use thiserror::Error;

/// Result alias used throughout the crate
pub type SimResult<T> = Result<T, SimError>;

/// Failure conditions raised by the solver
#[derive(Error, Debug)]
pub enum SimError {
    /// Two consecutive markers coincide, so the segment tangent is undefined
    #[error("degenerate front geometry: segment starting at marker {marker} has zero length")]
    DegenerateFront {
        /// Index of the first marker of the zero-length segment
        marker: usize,
    },

    /// SOR reached its iteration budget without meeting the tolerance
    #[error(
        "pressure solve did not converge: {iterations} iterations, max change {max_change:.3e} (tolerance {tolerance:.3e})"
    )]
    PressureNotConverged {
        iterations: usize,
        max_change: f64,
        tolerance: f64,
    },

    /// Restructuring left fewer markers than a closed polyline needs
    #[error("front collapsed: {markers} markers remain, at least 3 are required")]
    FrontCollapsed { markers: usize },

    /// A Lagrangian point fell outside the physical domain
    #[error("interface left domain at ({x:.6}, {y:.6})")]
    InterfaceLeftDomain { x: f64, y: f64 },

    /// A configuration value failed validation
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SimError {
    /// Create an `InvalidConfig` error
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Whether the run can reasonably continue after this error
    ///
    /// Only pressure non-convergence is recoverable: [`Simulation::step`] rolls the
    /// failed step back and the next attempt warm-starts from the best-effort
    /// pressure iterate.
    ///
    /// [`Simulation::step`]: crate::Simulation::step
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PressureNotConverged { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::FrontCollapsed { markers: 2 };
        assert_eq!(
            err.to_string(),
            "front collapsed: 2 markers remain, at least 3 are required"
        );

        let err = SimError::invalid_config("nx", "must be at least 2, got 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration: nx: must be at least 2, got 1"
        );
    }

    #[test]
    fn test_recoverable() {
        let err = SimError::PressureNotConverged {
            iterations: 1,
            max_change: 1.0,
            tolerance: 1e-6,
        };
        assert!(err.is_recoverable());
        assert!(!SimError::InterfaceLeftDomain { x: -1.0, y: 0.5 }.is_recoverable());
        assert!(!SimError::DegenerateFront { marker: 3 }.is_recoverable());
    }
}
