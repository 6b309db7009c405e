//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the engine stages in-memory
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EvaluationDomainError;

/// Named test functions with closed-form series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Exp,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    /// Natural logarithm `ln(x)`.
    Ln,
    /// `ln(1 + x)`.
    Ln1p,
    Atan,
    Sqrt,
    /// `1 / x`.
    Recip,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 12] = [
        FunctionKind::Exp,
        FunctionKind::Sin,
        FunctionKind::Cos,
        FunctionKind::Tan,
        FunctionKind::Sinh,
        FunctionKind::Cosh,
        FunctionKind::Tanh,
        FunctionKind::Ln,
        FunctionKind::Ln1p,
        FunctionKind::Atan,
        FunctionKind::Sqrt,
        FunctionKind::Recip,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FunctionKind::Exp => "exp(x)",
            FunctionKind::Sin => "sin(x)",
            FunctionKind::Cos => "cos(x)",
            FunctionKind::Tan => "tan(x)",
            FunctionKind::Sinh => "sinh(x)",
            FunctionKind::Cosh => "cosh(x)",
            FunctionKind::Tanh => "tanh(x)",
            FunctionKind::Ln => "ln(x)",
            FunctionKind::Ln1p => "ln(1+x)",
            FunctionKind::Atan => "atan(x)",
            FunctionKind::Sqrt => "sqrt(x)",
            FunctionKind::Recip => "1/x",
        }
    }

    /// Where an expansion point is admissible.
    pub fn expansion_domain(self) -> &'static str {
        match self {
            FunctionKind::Ln | FunctionKind::Sqrt => "a > 0",
            FunctionKind::Ln1p => "a > -1",
            FunctionKind::Recip => "a != 0",
            FunctionKind::Tan => "cos(a) != 0",
            _ => "all real a",
        }
    }

    /// The true function value.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            FunctionKind::Exp => x.exp(),
            FunctionKind::Sin => x.sin(),
            FunctionKind::Cos => x.cos(),
            FunctionKind::Tan => x.tan(),
            FunctionKind::Sinh => x.sinh(),
            FunctionKind::Cosh => x.cosh(),
            FunctionKind::Tanh => x.tanh(),
            FunctionKind::Ln => x.ln(),
            FunctionKind::Ln1p => x.ln_1p(),
            FunctionKind::Atan => x.atan(),
            FunctionKind::Sqrt => x.sqrt(),
            FunctionKind::Recip => 1.0 / x,
        }
    }

    /// Whether plots should label the x-axis in multiples of π by default.
    pub fn is_trigonometric(self) -> bool {
        matches!(self, FunctionKind::Sin | FunctionKind::Cos | FunctionKind::Tan)
    }
}

/// How Taylor coefficients are derived for a named function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Exact series recurrences for the known function family.
    ClosedForm,
    /// Central finite differences on the plain callable.
    Numeric,
}

/// Truncated Taylor series `Σ c_k (x - a)^k`, `k < N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSequence {
    pub function: String,
    /// Expansion point `a`.
    pub center: f64,
    /// `c_k = f^(k)(a) / k!`.
    pub coeffs: Vec<f64>,
}

impl CoefficientSequence {
    /// Number of coefficients `N`.
    pub fn order(&self) -> usize {
        self.coeffs.len()
    }

    /// Keep only the first `n` coefficients.
    pub fn truncated(&self, n: usize) -> CoefficientSequence {
        CoefficientSequence {
            function: self.function.clone(),
            center: self.center,
            coeffs: self.coeffs.iter().take(n).copied().collect(),
        }
    }
}

/// Rational approximant `R(x) = P(x - a) / Q(x - a)` with `Q(0) = 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadeCoefficients {
    pub function: String,
    pub center: f64,
    /// `b_0 ..= b_p`.
    pub numerator: Vec<f64>,
    /// `a_0 ..= a_q`, with `a_0 = 1`.
    pub denominator: Vec<f64>,
}

impl PadeCoefficients {
    pub fn p(&self) -> usize {
        self.numerator.len().saturating_sub(1)
    }

    pub fn q(&self) -> usize {
        self.denominator.len().saturating_sub(1)
    }
}

/// Either kind of approximant, as consumed by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Approximant {
    Taylor(CoefficientSequence),
    Pade(PadeCoefficients),
}

impl Approximant {
    /// Short label, e.g. `Taylor N=5` or `Pade [3/2]`.
    pub fn label(&self) -> String {
        match self {
            Approximant::Taylor(seq) => format!("Taylor N={}", seq.order()),
            Approximant::Pade(pade) => format!("Pade [{}/{}]", pade.p(), pade.q()),
        }
    }

    pub fn function(&self) -> &str {
        match self {
            Approximant::Taylor(seq) => &seq.function,
            Approximant::Pade(pade) => &pade.function,
        }
    }
}

/// What a run asks the engine to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ApproxRequest {
    /// Truncated Taylor series with `order` coefficients.
    Taylor { order: usize },
    /// Padé approximant of numerator degree `p`, denominator degree `q`.
    Pade { p: usize, q: usize },
}

impl ApproxRequest {
    /// Taylor coefficients needed to build this approximant.
    pub fn coefficients_needed(self) -> usize {
        match self {
            ApproxRequest::Taylor { order } => order,
            ApproxRequest::Pade { p, q } => p + q + 1,
        }
    }
}

impl std::fmt::Display for ApproxRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApproxRequest::Taylor { order } => write!(f, "Taylor N={order}"),
            ApproxRequest::Pade { p, q } => write!(f, "Pade [{p}/{q}]"),
        }
    }
}

/// One evaluated point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    /// Approximant value, or the pole that made it undefined.
    pub approx: Result<f64, EvaluationDomainError>,
    /// True function value (may be NaN outside the function's domain).
    pub truth: f64,
}

impl Sample {
    pub fn is_defined(&self) -> bool {
        self.approx.is_ok()
    }

    /// Absolute error where both values are finite.
    pub fn abs_err(&self) -> Option<f64> {
        match self.approx {
            Ok(v) if v.is_finite() && self.truth.is_finite() => Some((v - self.truth).abs()),
            _ => None,
        }
    }
}

/// Samples of one approximant over a domain, in domain order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub label: String,
    pub samples: Vec<Sample>,
}

impl SampleSet {
    /// `(x, approx)` for every defined sample.
    pub fn approx_points(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| s.approx.ok().map(|v| (s.x, v)))
            .collect()
    }

    /// `(x, truth)` for every sample with a finite true value.
    pub fn truth_points(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter(|s| s.truth.is_finite())
            .map(|s| (s.x, s.truth))
            .collect()
    }

    /// Poles hit during evaluation.
    pub fn undefined(&self) -> Vec<EvaluationDomainError> {
        self.samples.iter().filter_map(|s| s.approx.err()).collect()
    }

    /// Error statistics over the defined samples.
    pub fn quality(&self) -> ApproxQuality {
        let mut max_abs_err: f64 = 0.0;
        let mut sse = 0.0;
        let mut n_defined = 0usize;
        for err in self.samples.iter().filter_map(Sample::abs_err) {
            max_abs_err = max_abs_err.max(err);
            sse += err * err;
            n_defined += 1;
        }
        let rmse = if n_defined > 0 {
            (sse / n_defined as f64).sqrt()
        } else {
            f64::NAN
        };
        ApproxQuality {
            max_abs_err: if n_defined > 0 { max_abs_err } else { f64::NAN },
            rmse,
            n_defined,
            n_undefined: self.samples.iter().filter(|s| !s.is_defined()).count(),
        }
    }
}

/// Approximation quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproxQuality {
    pub max_abs_err: f64,
    pub rmse: f64,
    /// Samples with finite approximant and true values.
    pub n_defined: usize,
    /// Samples sitting on a pole of the approximant.
    pub n_undefined: usize,
}

/// A linearly spaced evaluation domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub x_min: f64,
    pub x_max: f64,
    pub points: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub function: FunctionKind,
    pub strategy: Strategy,
    /// Expansion point `a`.
    pub center: f64,
    pub requests: Vec<ApproxRequest>,
    pub domain: DomainSpec,

    /// Reciprocal condition number below which a Padé system is singular.
    pub singular_rcond: f64,
    /// Relative denominator size below which a sample is a pole.
    pub pole_tol: f64,
    /// Highest derivative order attempted by numeric differentiation.
    pub max_numeric_order: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub y_range: Option<(f64, f64)>,
    /// Label the x-axis in multiples of π.
    pub trig_axis: bool,
    pub svg: Option<PathBuf>,

    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
    pub debug_bundle: bool,
}

/// A saved approximation run (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproxRunFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub function: FunctionKind,
    pub center: f64,
    pub domain: DomainSpec,
    pub approximants: Vec<Approximant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_ignores_poles_and_nan_truth() {
        let set = SampleSet {
            label: "t".to_string(),
            samples: vec![
                Sample { x: 0.0, approx: Ok(1.0), truth: 1.5 },
                Sample {
                    x: 1.0,
                    approx: Err(EvaluationDomainError { x: 1.0, denominator: 0.0 }),
                    truth: 2.0,
                },
                Sample { x: 2.0, approx: Ok(3.0), truth: f64::NAN },
                Sample { x: 3.0, approx: Ok(4.0), truth: 4.0 },
            ],
        };
        let q = set.quality();
        assert_eq!(q.n_defined, 2);
        assert_eq!(q.n_undefined, 1);
        assert!((q.max_abs_err - 0.5).abs() < 1e-15);
        assert!((q.rmse - (0.125f64).sqrt()).abs() < 1e-15);
        assert_eq!(set.approx_points().len(), 3);
        assert_eq!(set.truth_points().len(), 3);
    }

    #[test]
    fn request_coefficient_needs() {
        assert_eq!(ApproxRequest::Taylor { order: 6 }.coefficients_needed(), 6);
        assert_eq!(ApproxRequest::Pade { p: 3, q: 2 }.coefficients_needed(), 6);
        assert_eq!(ApproxRequest::Pade { p: 3, q: 2 }.to_string(), "Pade [3/2]");
    }
}
