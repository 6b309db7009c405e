//! Taylor coefficient derivation.
//!
//! Two strategies, selected by the [`TargetFunction`] variant:
//!
//! - `ClosedForm`: the named function family is propagated through the series
//!   recurrences in [`series_ops`](crate::math::series_ops), starting from the
//!   identity series `[a, 1, 0, …]`. Exact up to floating-point rounding.
//! - `Numeric`: the callable is treated as a black box and each derivative is
//!   estimated with a central finite difference. Accuracy degrades quickly with
//!   the derivative order, so the order is capped (see [`SeriesOptions`]).

use std::sync::Arc;

use crate::domain::{CoefficientSequence, FunctionKind};
use crate::error::{ApproxError, DifferentiationError};
use crate::math::series_ops;

/// Default cap on the derivative order attempted by finite differences.
pub const DEFAULT_MAX_NUMERIC_ORDER: usize = 10;

/// `|cos(a)|` below this is treated as a pole of `tan`.
const TAN_POLE_EPS: f64 = 1e-12;

/// A function to approximate.
#[derive(Clone)]
pub enum TargetFunction {
    /// A registry function with exact series recurrences.
    ClosedForm(FunctionKind),
    /// An arbitrary callable, differentiated numerically.
    Numeric {
        name: String,
        f: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
        /// Fixed finite-difference step; `None` picks `ε^(1/(k+2))` per order `k`.
        step: Option<f64>,
    },
}

impl TargetFunction {
    pub fn closed_form(kind: FunctionKind) -> Self {
        TargetFunction::ClosedForm(kind)
    }

    pub fn numeric(name: impl Into<String>, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        TargetFunction::Numeric {
            name: name.into(),
            f: Arc::new(f),
            step: None,
        }
    }

    /// Treat a registry function as an opaque callable.
    pub fn numeric_from(kind: FunctionKind) -> Self {
        Self::numeric(kind.display_name(), move |x| kind.eval(x))
    }

    /// Fix the finite-difference step (ignored for closed forms).
    pub fn with_step(self, h: f64) -> Self {
        match self {
            TargetFunction::Numeric { name, f, .. } => TargetFunction::Numeric {
                name,
                f,
                step: Some(h),
            },
            other => other,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TargetFunction::ClosedForm(kind) => kind.display_name(),
            TargetFunction::Numeric { name, .. } => name,
        }
    }

    /// Evaluate the true function.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            TargetFunction::ClosedForm(kind) => kind.eval(x),
            TargetFunction::Numeric { f, .. } => f(x),
        }
    }
}

impl std::fmt::Debug for TargetFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetFunction::ClosedForm(kind) => f.debug_tuple("ClosedForm").field(kind).finish(),
            TargetFunction::Numeric { name, step, .. } => f
                .debug_struct("Numeric")
                .field("name", name)
                .field("step", step)
                .finish_non_exhaustive(),
        }
    }
}

/// Knobs for coefficient derivation.
#[derive(Debug, Clone, Copy)]
pub struct SeriesOptions {
    pub max_numeric_order: usize,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            max_numeric_order: DEFAULT_MAX_NUMERIC_ORDER,
        }
    }
}

/// First `n` Taylor coefficients of `f` about `a`, with default options.
pub fn coefficients(f: &TargetFunction, a: f64, n: usize) -> Result<CoefficientSequence, ApproxError> {
    coefficients_with(f, a, n, &SeriesOptions::default())
}

/// First `n` Taylor coefficients of `f` about `a`.
pub fn coefficients_with(
    f: &TargetFunction,
    a: f64,
    n: usize,
    opts: &SeriesOptions,
) -> Result<CoefficientSequence, ApproxError> {
    if n == 0 {
        return Err(ApproxError::InvalidInput(format!(
            "Taylor order N must be >= 1 for {}.",
            f.name()
        )));
    }
    let fail = |reason: &str| DifferentiationError {
        function: f.name().to_string(),
        point: a,
        order: n - 1,
        reason: reason.to_string(),
    };
    if !a.is_finite() {
        return Err(fail("expansion point is not finite").into());
    }

    let coeffs = match f {
        TargetFunction::ClosedForm(kind) => closed_form(*kind, a, n).map_err(fail)?,
        TargetFunction::Numeric { f: func, step, .. } => {
            numeric(func.as_ref(), a, n, *step, opts.max_numeric_order).map_err(|reason| fail(&reason))?
        }
    };

    if let Some(k) = coeffs.iter().position(|c| !c.is_finite()) {
        return Err(fail(&format!("coefficient c_{k} overflowed")).into());
    }

    log::debug!("{} about a={a}: {} coefficients", f.name(), coeffs.len());
    Ok(CoefficientSequence {
        function: f.name().to_string(),
        center: a,
        coeffs,
    })
}

fn closed_form(kind: FunctionKind, a: f64, n: usize) -> Result<Vec<f64>, &'static str> {
    let x = series_ops::identity(a, n);
    let coeffs = match kind {
        FunctionKind::Exp => series_ops::exp(&x),
        FunctionKind::Sin => series_ops::sin_cos(&x).0,
        FunctionKind::Cos => series_ops::sin_cos(&x).1,
        FunctionKind::Tan => {
            let (s, c) = series_ops::sin_cos(&x);
            if c[0].abs() < TAN_POLE_EPS {
                return Err("tan has a pole at the expansion point");
            }
            series_ops::div(&s, &c)
        }
        FunctionKind::Sinh => series_ops::sinh_cosh(&x).0,
        FunctionKind::Cosh => series_ops::sinh_cosh(&x).1,
        FunctionKind::Tanh => {
            let (sh, ch) = series_ops::sinh_cosh(&x);
            series_ops::div(&sh, &ch)
        }
        FunctionKind::Ln => {
            if a <= 0.0 {
                return Err("ln is only analytic for a > 0");
            }
            series_ops::ln(&x)
        }
        FunctionKind::Ln1p => {
            if a <= -1.0 {
                return Err("ln(1+x) is only analytic for a > -1");
            }
            let mut y = x;
            y[0] = 1.0 + a;
            let mut c = series_ops::ln(&y);
            // ln_1p keeps c_0 accurate for small a.
            c[0] = a.ln_1p();
            c
        }
        FunctionKind::Atan => {
            // atan' = 1 / (1 + x^2); (1 + x^2) about a is (1 + a^2) + 2a t + t^2.
            let d = series_ops::padded(&[1.0 + a * a, 2.0 * a, 1.0], n - 1);
            series_ops::integrate(&series_ops::recip(&d), a.atan(), n)
        }
        FunctionKind::Sqrt => {
            if a <= 0.0 {
                return Err("sqrt is only analytic for a > 0");
            }
            series_ops::sqrt(&x)
        }
        FunctionKind::Recip => {
            if a == 0.0 {
                return Err("1/x has a pole at the expansion point");
            }
            series_ops::recip(&x)
        }
    };
    Ok(coeffs)
}

fn numeric(
    f: &(dyn Fn(f64) -> f64 + Send + Sync),
    a: f64,
    n: usize,
    step: Option<f64>,
    max_order: usize,
) -> Result<Vec<f64>, String> {
    if n - 1 > max_order {
        return Err(format!(
            "numeric differentiation is unstable beyond order {max_order}"
        ));
    }

    let scale = a.abs().max(1.0);
    let mut out = Vec::with_capacity(n);
    let mut factorial = 1.0;
    for k in 0..n {
        let derivative = if k == 0 {
            f(a)
        } else {
            factorial *= k as f64;
            let h = step.unwrap_or_else(|| f64::EPSILON.powf(1.0 / (k as f64 + 2.0))) * scale;
            if !(h.is_finite() && h > 0.0) {
                return Err(format!("invalid finite-difference step h={h}"));
            }
            log::debug!("finite difference order {k} at a={a}: h={h:.3e}");
            central_difference(f, a, k, h)
                .ok_or_else(|| format!("function is not finite within {h:.3e} of the expansion point"))?
        };
        if !derivative.is_finite() {
            return Err(format!("derivative of order {k} is not finite"));
        }
        out.push(derivative / factorial);
    }
    Ok(out)
}

/// `f^(k)(a) ≈ h^-k Σ_{j=0}^{k} (-1)^j C(k,j) f(a + (k/2 - j) h)`
///
/// Returns `None` if any sample of `f` is non-finite.
fn central_difference(f: &(dyn Fn(f64) -> f64 + Send + Sync), a: f64, k: usize, h: f64) -> Option<f64> {
    let mut sum = 0.0;
    let mut binom = 1.0;
    for j in 0..=k {
        let v = f(a + (k as f64 / 2.0 - j as f64) * h);
        if !v.is_finite() {
            return None;
        }
        let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign * binom * v;
        // C(k, j+1) = C(k, j) (k - j) / (j + 1)
        binom = binom * (k - j) as f64 / (j + 1) as f64;
    }
    Some(sum / h.powi(k as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs(kind: FunctionKind, a: f64, n: usize) -> Vec<f64> {
        coefficients(&TargetFunction::closed_form(kind), a, n)
            .unwrap()
            .coeffs
    }

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (k, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < tol, "coeff {k}: got {a}, expected {e}");
        }
    }

    #[test]
    fn exp_coefficients_are_inverse_factorials() {
        let c = coeffs(FunctionKind::Exp, 0.0, 10);
        let mut fact = 1.0;
        for (k, &ck) in c.iter().enumerate() {
            if k > 0 {
                fact *= k as f64;
            }
            assert!((ck - 1.0 / fact).abs() < 1e-15, "k={k}");
        }
    }

    #[test]
    fn sin_at_zero_order_six() {
        let c = coeffs(FunctionKind::Sin, 0.0, 6);
        assert_close(&c, &[0.0, 1.0, 0.0, -1.0 / 6.0, 0.0, 1.0 / 120.0], 1e-15);
    }

    #[test]
    fn shifted_expansions_match_derivatives() {
        let a: f64 = 0.7;
        // cos about a: [cos a, -sin a, -cos a / 2, sin a / 6]
        assert_close(
            &coeffs(FunctionKind::Cos, a, 4),
            &[a.cos(), -a.sin(), -a.cos() / 2.0, a.sin() / 6.0],
            1e-14,
        );
        // ln about a: [ln a, 1/a, -1/(2a^2), 1/(3a^3)]
        assert_close(
            &coeffs(FunctionKind::Ln, a, 4),
            &[a.ln(), 1.0 / a, -1.0 / (2.0 * a * a), 1.0 / (3.0 * a.powi(3))],
            1e-13,
        );
        // 1/x about a: (-1)^k / a^(k+1)
        assert_close(
            &coeffs(FunctionKind::Recip, a, 4),
            &[1.0 / a, -1.0 / a.powi(2), 1.0 / a.powi(3), -1.0 / a.powi(4)],
            1e-12,
        );
    }

    #[test]
    fn tan_tanh_atan_at_zero() {
        assert_close(
            &coeffs(FunctionKind::Tan, 0.0, 6),
            &[0.0, 1.0, 0.0, 1.0 / 3.0, 0.0, 2.0 / 15.0],
            1e-15,
        );
        assert_close(
            &coeffs(FunctionKind::Tanh, 0.0, 6),
            &[0.0, 1.0, 0.0, -1.0 / 3.0, 0.0, 2.0 / 15.0],
            1e-15,
        );
        assert_close(
            &coeffs(FunctionKind::Atan, 0.0, 6),
            &[0.0, 1.0, 0.0, -1.0 / 3.0, 0.0, 1.0 / 5.0],
            1e-15,
        );
        assert_close(
            &coeffs(FunctionKind::Ln1p, 0.0, 5),
            &[0.0, 1.0, -0.5, 1.0 / 3.0, -0.25],
            1e-15,
        );
        assert_close(
            &coeffs(FunctionKind::Sqrt, 1.0, 4),
            &[1.0, 0.5, -0.125, 0.0625],
            1e-15,
        );
    }

    #[test]
    fn order_one_is_just_the_value() {
        assert_close(&coeffs(FunctionKind::Atan, 1.0, 1), &[std::f64::consts::FRAC_PI_4], 1e-15);
        assert_close(&coeffs(FunctionKind::Cosh, 0.0, 1), &[1.0], 1e-15);
    }

    #[test]
    fn singular_expansion_points_are_rejected() {
        let cases = [
            (FunctionKind::Recip, 0.0),
            (FunctionKind::Ln, 0.0),
            (FunctionKind::Ln, -1.0),
            (FunctionKind::Sqrt, 0.0),
            (FunctionKind::Ln1p, -1.0),
            (FunctionKind::Tan, std::f64::consts::FRAC_PI_2),
        ];
        for (kind, a) in cases {
            let err = coefficients(&TargetFunction::closed_form(kind), a, 4).unwrap_err();
            match err {
                ApproxError::Differentiation(e) => {
                    assert_eq!(e.function, kind.display_name());
                    assert_eq!(e.order, 3);
                    assert_eq!(e.point, a);
                }
                other => panic!("expected differentiation error for {kind:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_order_is_invalid_input() {
        let err = coefficients(&TargetFunction::closed_form(FunctionKind::Exp), 0.0, 0).unwrap_err();
        match err {
            ApproxError::InvalidInput(msg) => assert!(msg.contains("exp(x)"), "{msg}"),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn numeric_matches_closed_form_for_exp() {
        let numeric = coefficients(&TargetFunction::numeric_from(FunctionKind::Exp), 0.5, 5).unwrap();
        let exact = coeffs(FunctionKind::Exp, 0.5, 5);
        assert_eq!(numeric.function, "exp(x)");
        assert_close(&numeric.coeffs, &exact, 1e-4);
    }

    #[test]
    fn numeric_accepts_arbitrary_closures() {
        let f = TargetFunction::numeric("x^3 - 2x", |x| x * x * x - 2.0 * x);
        let c = coefficients(&f, 1.0, 4).unwrap();
        // about 1: (x^3 - 2x) = -1 + t + 3t^2 + t^3
        assert_close(&c.coeffs, &[-1.0, 1.0, 3.0, 1.0], 1e-4);
    }

    #[test]
    fn fixed_step_is_honored() {
        let f = TargetFunction::numeric("x^3 - 2x", |x| x * x * x - 2.0 * x).with_step(1e-2);
        assert!(format!("{f:?}").contains("Some(0.01)"));
        let c = coefficients(&f, 1.0, 4).unwrap();
        assert_close(&c.coeffs, &[-1.0, 1.0, 3.0, 1.0], 1e-4);

        // A closed form has no step to fix.
        let exp = TargetFunction::closed_form(FunctionKind::Exp).with_step(1e-2);
        assert!(matches!(exp, TargetFunction::ClosedForm(FunctionKind::Exp)));
    }

    #[test]
    fn numeric_fails_at_poles_and_high_orders() {
        let recip = TargetFunction::numeric_from(FunctionKind::Recip);
        assert!(matches!(
            coefficients(&recip, 0.0, 3),
            Err(ApproxError::Differentiation(_))
        ));

        let exp = TargetFunction::numeric_from(FunctionKind::Exp);
        let opts = SeriesOptions { max_numeric_order: 4 };
        assert!(matches!(
            coefficients_with(&exp, 0.0, 6, &opts),
            Err(ApproxError::Differentiation(_))
        ));
    }
}
