//! Approximant evaluation over a domain.
//!
//! Both forms are evaluated in the shifted variable `t = x - a` with Horner's
//! rule. Padé samples whose denominator vanishes (relative to the size of its
//! terms) are flagged instead of producing `inf`/`NaN`, and evaluation carries on.

use crate::domain::{Approximant, CoefficientSequence, PadeCoefficients, Sample, SampleSet};
use crate::error::{ApproxError, EvaluationDomainError};
use crate::math::series::TargetFunction;
use crate::math::series_ops::{horner, horner_abs};

/// Default relative denominator size below which a sample is a pole.
pub const DEFAULT_POLE_TOL: f64 = 1e-12;

/// Knobs for evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    pub pole_tol: f64,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            pole_tol: DEFAULT_POLE_TOL,
        }
    }
}

impl EvalOptions {
    /// `pole_tol` must be finite and non-negative; a NaN would flag every sample.
    pub fn validate(&self) -> Result<(), ApproxError> {
        if self.pole_tol.is_finite() && self.pole_tol >= 0.0 {
            Ok(())
        } else {
            Err(ApproxError::InvalidInput(format!(
                "pole tolerance must be finite and >= 0, got {}",
                self.pole_tol
            )))
        }
    }
}

/// Evaluate the truncated power series at `x`.
pub fn eval_taylor(seq: &CoefficientSequence, x: f64) -> f64 {
    horner(&seq.coeffs, x - seq.center)
}

/// Evaluate the rational form at `x`.
///
/// Fails when `|Q(t)| <= pole_tol · Σ |a_j| |t|^j` or the quotient is not finite.
pub fn eval_pade(pade: &PadeCoefficients, x: f64, pole_tol: f64) -> Result<f64, EvaluationDomainError> {
    let t = x - pade.center;
    let den = horner(&pade.denominator, t);
    let scale = horner_abs(&pade.denominator, t);
    if !(den.abs() > pole_tol * scale) {
        return Err(EvaluationDomainError { x, denominator: den });
    }
    let value = horner(&pade.numerator, t) / den;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationDomainError { x, denominator: den })
    }
}

/// Evaluate `approximant` and the true function at every point of `domain`.
pub fn evaluate(
    approximant: &Approximant,
    truth: &TargetFunction,
    domain: &[f64],
    opts: &EvalOptions,
) -> SampleSet {
    evaluate_fn(approximant, |x| truth.eval(x), domain, opts)
}

/// [`evaluate`] with any callable as the true function.
///
/// Output order matches `domain`; nothing is filtered or deduplicated.
pub fn evaluate_fn<F>(approximant: &Approximant, truth: F, domain: &[f64], opts: &EvalOptions) -> SampleSet
where
    F: Fn(f64) -> f64,
{
    let samples: Vec<Sample> = domain
        .iter()
        .map(|&x| {
            let approx = match approximant {
                Approximant::Taylor(seq) => Ok(eval_taylor(seq, x)),
                Approximant::Pade(pade) => eval_pade(pade, x, opts.pole_tol),
            };
            Sample {
                x,
                approx,
                truth: truth(x),
            }
        })
        .collect();

    let poles = samples.iter().filter(|s| !s.is_defined()).count();
    if poles > 0 {
        log::warn!(
            "{} of {}: {poles} sample(s) on a pole of the approximant",
            approximant.label(),
            approximant.function()
        );
    }

    SampleSet {
        label: approximant.label(),
        samples,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{E, FRAC_PI_2};

    use super::*;
    use crate::domain::FunctionKind;
    use crate::math::pade::{PadeOptions, solve};
    use crate::math::series::coefficients;

    fn exp_one_one() -> PadeCoefficients {
        let c = CoefficientSequence {
            function: "exp(x)".to_string(),
            center: 0.0,
            coeffs: vec![1.0, 1.0, 0.5, 1.0 / 6.0],
        };
        solve(&c, 1, 1, &PadeOptions::default()).unwrap()
    }

    #[test]
    fn sin_truncation_error_at_half_pi() {
        let sin = TargetFunction::closed_form(FunctionKind::Sin);
        let c = coefficients(&sin, 0.0, 6).unwrap();
        let set = evaluate(&Approximant::Taylor(c), &sin, &[FRAC_PI_2], &EvalOptions::default());
        let s = set.samples[0];
        let approx = s.approx.unwrap();
        // π/2 - (π/2)^3/6 + (π/2)^5/120
        assert!((approx - 1.004_524_855_534_817_7).abs() < 1e-12, "{approx}");
        assert!((s.truth - 1.0).abs() < 1e-15);
    }

    #[test]
    fn sin_degree_four_at_half_pi() {
        // N = 5 drops the x^5 term; this is the ≈ 0.9248 truncation.
        let sin = TargetFunction::closed_form(FunctionKind::Sin);
        let c = coefficients(&sin, 0.0, 5).unwrap();
        let v = eval_taylor(&c, FRAC_PI_2);
        assert!((v - 0.924_832_229_288_650_2).abs() < 1e-12, "{v}");
    }

    #[test]
    fn pade_beats_linear_taylor_for_exp() {
        let pade = exp_one_one();
        let r1 = eval_pade(&pade, 1.0, DEFAULT_POLE_TOL).unwrap();
        assert!((r1 - 3.0).abs() < 1e-15);

        let linear = CoefficientSequence {
            function: "exp(x)".to_string(),
            center: 0.0,
            coeffs: vec![1.0, 1.0],
        };
        let t1 = eval_taylor(&linear, 1.0);
        assert!((r1 - E).abs() < (t1 - E).abs());
    }

    #[test]
    fn samples_keep_domain_order() {
        let exp = TargetFunction::closed_form(FunctionKind::Exp);
        let c = coefficients(&exp, 0.0, 4).unwrap();
        let domain = [0.5, -1.0, 0.5, 2.0];
        let set = evaluate(&Approximant::Taylor(c), &exp, &domain, &EvalOptions::default());
        let xs: Vec<f64> = set.samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, domain);
        assert_eq!(set.label, "Taylor N=4");
    }

    #[test]
    fn pole_is_flagged_exactly_once() {
        // (1 + x/2) / (1 - x/2) has its pole at x = 2.
        let pade = exp_one_one();
        let domain = [0.0, 1.0, 1.9, 2.0, 2.1, 3.0];
        let set = evaluate_fn(&Approximant::Pade(pade), f64::exp, &domain, &EvalOptions::default());

        assert_eq!(set.samples.len(), domain.len());
        let undefined = set.undefined();
        assert_eq!(undefined.len(), 1);
        assert_eq!(undefined[0].x, 2.0);
        assert_eq!(undefined[0].denominator, 0.0);
        for s in set.samples.iter().filter(|s| s.x != 2.0) {
            assert!(s.approx.unwrap().is_finite(), "x={}", s.x);
        }
        // x = 3: (1 + 1.5) / (1 - 1.5) = -5
        assert!((set.samples[5].approx.unwrap() + 5.0).abs() < 1e-14);
    }

    #[test]
    fn shifted_center_is_respected() {
        let pade = PadeCoefficients {
            function: "f".to_string(),
            center: 1.0,
            numerator: vec![2.0],
            denominator: vec![1.0, 1.0],
        };
        // 2 / (1 + (x - 1)) = 2 / x
        assert!((eval_pade(&pade, 4.0, DEFAULT_POLE_TOL).unwrap() - 0.5).abs() < 1e-15);
        assert!(eval_pade(&pade, 0.0, DEFAULT_POLE_TOL).is_err());
    }

    #[test]
    fn pole_tolerance_must_be_a_finite_non_negative_number() {
        assert!(EvalOptions::default().validate().is_ok());
        assert!(EvalOptions { pole_tol: 0.0 }.validate().is_ok());
        for pole_tol in [f64::NAN, -1.0, f64::INFINITY] {
            let err = EvalOptions { pole_tol }.validate().unwrap_err();
            assert_eq!(err.exit_code(), 2);
        }
    }
}
