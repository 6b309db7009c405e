//! Error types.
//!
//! Two layers:
//!
//! - [`ApproxError`] and its payloads are the typed failures of the approximation
//!   engine. They carry the function name, requested order/degrees and the
//!   offending point so callers can act on them without inspecting internals.
//! - [`AppError`] is what the binary reports: a message plus a process exit code.

use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// The function could not be differentiated to the requested order at the
/// expansion point.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferentiationError {
    pub function: String,
    pub point: f64,
    /// Highest derivative order that was requested (`N - 1`).
    pub order: usize,
    pub reason: String,
}

impl std::fmt::Display for DifferentiationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot differentiate {} to order {} at x={}: {}",
            self.function, self.order, self.point, self.reason
        )
    }
}

impl std::error::Error for DifferentiationError {}

/// The Toeplitz system for the denominator has no unique solution.
#[derive(Debug, Clone, PartialEq)]
pub struct SingularSystemError {
    pub function: String,
    pub p: usize,
    pub q: usize,
    /// Observed reciprocal condition number (`σ_min / σ_max`).
    pub rcond: f64,
    /// Threshold below which the system is declared singular.
    pub tolerance: f64,
}

impl std::fmt::Display for SingularSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No unique Pade [{}/{}] approximant for {}: denominator system is singular (rcond={:.3e} < tol={:.3e})",
            self.p, self.q, self.function, self.rcond, self.tolerance
        )
    }
}

impl std::error::Error for SingularSystemError {}

/// The rational approximant has a pole at `x`.
///
/// Attached to a single sample; never aborts an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDomainError {
    pub x: f64,
    /// Denominator value observed at `x`.
    pub denominator: f64,
}

impl std::fmt::Display for EvaluationDomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pade denominator vanishes at x={} (Q={:.3e})",
            self.x, self.denominator
        )
    }
}

impl std::error::Error for EvaluationDomainError {}

/// Engine failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ApproxError {
    Differentiation(DifferentiationError),
    SingularSystem(SingularSystemError),
    /// `p + q + 1` exceeds the number of available Taylor coefficients.
    DegreeConstraint {
        function: String,
        p: usize,
        q: usize,
        available: usize,
    },
    InvalidInput(String),
}

impl ApproxError {
    /// Exit code used when the error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            ApproxError::InvalidInput(_) | ApproxError::DegreeConstraint { .. } => 2,
            ApproxError::Differentiation(_) => 3,
            ApproxError::SingularSystem(_) => 4,
        }
    }
}

impl std::fmt::Display for ApproxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApproxError::Differentiation(e) => write!(f, "{e}"),
            ApproxError::SingularSystem(e) => write!(f, "{e}"),
            ApproxError::DegreeConstraint {
                function,
                p,
                q,
                available,
            } => write!(
                f,
                "Pade [{p}/{q}] of {function} needs {} Taylor coefficients but only {available} are available",
                p + q + 1
            ),
            ApproxError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
        }
    }
}

impl std::error::Error for ApproxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApproxError::Differentiation(e) => Some(e),
            ApproxError::SingularSystem(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DifferentiationError> for ApproxError {
    fn from(value: DifferentiationError) -> Self {
        ApproxError::Differentiation(value)
    }
}

impl From<SingularSystemError> for ApproxError {
    fn from(value: SingularSystemError) -> Self {
        ApproxError::SingularSystem(value)
    }
}

impl From<ApproxError> for AppError {
    fn from(value: ApproxError) -> Self {
        AppError::new(value.exit_code(), value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_exit_codes() {
        let e = ApproxError::DegreeConstraint {
            function: "exp(x)".to_string(),
            p: 3,
            q: 2,
            available: 4,
        };
        assert_eq!(e.exit_code(), 2);
        assert_eq!(
            e.to_string(),
            "Pade [3/2] of exp(x) needs 6 Taylor coefficients but only 4 are available"
        );

        let e: ApproxError = SingularSystemError {
            function: "sin(x)".to_string(),
            p: 0,
            q: 1,
            rcond: 0.0,
            tolerance: 1e-12,
        }
        .into();
        let app: AppError = e.into();
        assert_eq!(app.exit_code(), 4);
        assert!(app.message().contains("[0/1]"));
    }
}
