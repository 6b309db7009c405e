//! Padé approximants from Taylor coefficients.
//!
//! For degrees `(p, q)` we look for
//!
//! ```text
//! R(t) = (b_0 + … + b_p t^p) / (1 + a_1 t + … + a_q t^q)
//! ```
//!
//! whose expansion matches `c_0 … c_{p+q}`. Multiplying through by the denominator,
//! the coefficients of `t^{p+1} … t^{p+q}` of `Q(t) Σ c_k t^k` must vanish, giving the
//! `q × q` Toeplitz system
//!
//! ```text
//! Σ_{j=1}^{q} a_j c_{p+i-j} = -c_{p+i},   i = 1..q   (c_k = 0 for k < 0)
//! ```
//!
//! The numerator then follows as the convolution `b_i = Σ_{j=0}^{min(i,q)} a_j c_{i-j}`.
//!
//! Implementation choices:
//! - Coefficients are first rewritten in `s = t / ρ`, with `ρ` taken from the decay
//!   between the first and last nonzero coefficient. Rapidly decaying series such as
//!   `1/k!` would otherwise look ill-conditioned for a reason unrelated to whether
//!   the approximant exists.
//! - The system is tiny, so we afford an SVD to measure the reciprocal condition
//!   number of the rescaled system before solving. Below
//!   [`PadeOptions::singular_rcond`] the approximant of that degree is declared
//!   non-existent rather than returning noise.
//! - The actual solve uses LU with partial pivoting; `a_j` is unscaled by `ρ^-j`.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CoefficientSequence, PadeCoefficients};
use crate::error::{ApproxError, SingularSystemError};
use crate::math::series_ops;

/// Default reciprocal condition number below which the denominator system is singular.
pub const DEFAULT_SINGULAR_RCOND: f64 = 1e-12;

/// Knobs for the Padé solver.
#[derive(Debug, Clone, Copy)]
pub struct PadeOptions {
    pub singular_rcond: f64,
}

impl Default for PadeOptions {
    fn default() -> Self {
        Self {
            singular_rcond: DEFAULT_SINGULAR_RCOND,
        }
    }
}

/// Solve for the `[p/q]` Padé approximant of `coeffs`.
///
/// Only `coeffs[0..=p+q]` are used; extra coefficients are ignored.
pub fn solve(
    coeffs: &CoefficientSequence,
    p: usize,
    q: usize,
    opts: &PadeOptions,
) -> Result<PadeCoefficients, ApproxError> {
    let c = &coeffs.coeffs;
    if p + q + 1 > c.len() {
        return Err(ApproxError::DegreeConstraint {
            function: coeffs.function.clone(),
            p,
            q,
            available: c.len(),
        });
    }
    if !(opts.singular_rcond.is_finite() && opts.singular_rcond >= 0.0) {
        return Err(ApproxError::InvalidInput(format!(
            "singular tolerance must be finite and >= 0, got {}",
            opts.singular_rcond
        )));
    }

    let singular = |rcond: f64| SingularSystemError {
        function: coeffs.function.clone(),
        p,
        q,
        rcond,
        tolerance: opts.singular_rcond,
    };

    let mut denominator = Vec::with_capacity(q + 1);
    denominator.push(1.0);

    if q > 0 {
        let (scaled, rho) = rescale(&c[..=p + q]);
        let m = toeplitz_system(&scaled, p, q);
        let rhs = DVector::from_fn(q, |i, _| -scaled[p + i + 1]);

        let rcond = reciprocal_condition(&m);
        // Negated comparison so a NaN rcond is also rejected.
        if !(rcond >= opts.singular_rcond) || rcond == 0.0 {
            return Err(singular(rcond).into());
        }

        let sol = m.lu().solve(&rhs).ok_or_else(|| singular(rcond))?;
        if sol.iter().any(|v| !v.is_finite()) {
            return Err(singular(rcond).into());
        }
        denominator.extend(
            sol.iter()
                .zip(1_i32..)
                .map(|(a, j)| a / rho.powi(j)),
        );
        if denominator.iter().any(|v| !v.is_finite()) {
            return Err(singular(rcond).into());
        }
        log::debug!(
            "Pade [{p}/{q}] for {}: rho={rho:.3e}, rcond={rcond:.3e}, denominator={denominator:?}",
            coeffs.function
        );
    }

    let numerator = (0..=p)
        .map(|i| {
            (0..=i.min(q))
                .map(|j| denominator[j] * c[i - j])
                .sum::<f64>()
        })
        .collect();

    Ok(PadeCoefficients {
        function: coeffs.function.clone(),
        center: coeffs.center,
        numerator,
        denominator,
    })
}

/// Re-expand `R = P / Q` into its first `n` Taylor coefficients.
///
/// For a correct `[p/q]` approximant the first `p + q + 1` terms reproduce the
/// coefficients it was built from.
pub fn taylor_expansion(pade: &PadeCoefficients, n: usize) -> Vec<f64> {
    let num = series_ops::padded(&pade.numerator, n);
    series_ops::div(&num, &pade.denominator)
}

/// `ρ = (|c_lo| / |c_hi|)^(1 / (hi - lo))` over the first and last nonzero
/// coefficients, so that `c_k ρ^k` starts and ends at the same magnitude.
///
/// Falls back to `1.0` when fewer than two coefficients are nonzero.
fn series_scale(c: &[f64]) -> f64 {
    let mut nonzero = c.iter().enumerate().filter(|(_, v)| **v != 0.0);
    let Some((lo, c_lo)) = nonzero.next() else {
        return 1.0;
    };
    let Some((hi, c_hi)) = nonzero.last() else {
        return 1.0;
    };
    let rho = (c_lo.abs() / c_hi.abs()).powf(1.0 / (hi - lo) as f64);
    if rho.is_finite() && rho > 0.0 { rho } else { 1.0 }
}

/// `(c_k ρ^k, ρ)`, or `(c, 1.0)` if the rescale would over- or underflow.
fn rescale(c: &[f64]) -> (Vec<f64>, f64) {
    let rho = series_scale(c);
    let scaled: Vec<f64> = c.iter().zip(0_i32..).map(|(v, k)| v * rho.powi(k)).collect();
    let lossy = scaled
        .iter()
        .zip(c)
        .any(|(s, v)| !s.is_finite() || (*s == 0.0 && *v != 0.0));
    if lossy { (c.to_vec(), 1.0) } else { (scaled, rho) }
}

/// Row `i`, column `j` (0-based) holds `c_{p+i-j}`, i.e. the coefficient multiplying
/// `a_{j+1}` in equation `i+1`.
fn toeplitz_system(c: &[f64], p: usize, q: usize) -> DMatrix<f64> {
    DMatrix::from_fn(q, q, |i, j| {
        let k = p as isize + i as isize - j as isize;
        if k < 0 { 0.0 } else { c[k as usize] }
    })
}

/// `σ_min / σ_max`, or `0.0` for a zero (or non-finite) matrix.
fn reciprocal_condition(m: &DMatrix<f64>) -> f64 {
    let sv = m.clone().singular_values();
    let max = sv.iter().copied().fold(0.0_f64, f64::max);
    let min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    if !(max.is_finite() && max > 0.0) {
        return 0.0;
    }
    min / max
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use rand::rngs::StdRng;

    use super::*;
    use crate::domain::FunctionKind;
    use crate::math::series::{TargetFunction, coefficients};

    fn seq(coeffs: &[f64]) -> CoefficientSequence {
        CoefficientSequence {
            function: "test".to_string(),
            center: 0.0,
            coeffs: coeffs.to_vec(),
        }
    }

    #[test]
    fn exp_one_one_is_the_classic_form() {
        let c = seq(&[1.0, 1.0, 0.5, 1.0 / 6.0]);
        let pade = solve(&c, 1, 1, &PadeOptions::default()).unwrap();
        // (1 + x/2) / (1 - x/2)
        assert!((pade.numerator[0] - 1.0).abs() < 1e-15);
        assert!((pade.numerator[1] - 0.5).abs() < 1e-15);
        assert_eq!(pade.denominator[0], 1.0);
        assert!((pade.denominator[1] + 0.5).abs() < 1e-15);
        assert_eq!((pade.p(), pade.q()), (1, 1));
    }

    #[test]
    fn sin_three_two() {
        let c = coefficients(&TargetFunction::closed_form(FunctionKind::Sin), 0.0, 6).unwrap();
        let pade = solve(&c, 3, 2, &PadeOptions::default()).unwrap();
        // sin x ≈ (x - 7x^3/60) / (1 + x^2/20)
        let expected_num = [0.0, 1.0, 0.0, -7.0 / 60.0];
        let expected_den = [1.0, 0.0, 1.0 / 20.0];
        for (a, e) in pade.numerator.iter().zip(expected_num) {
            assert!((a - e).abs() < 1e-14, "{:?}", pade.numerator);
        }
        for (a, e) in pade.denominator.iter().zip(expected_den) {
            assert!((a - e).abs() < 1e-14, "{:?}", pade.denominator);
        }
    }

    #[test]
    fn q_zero_is_the_truncated_taylor_polynomial() {
        let c = seq(&[3.0, -1.0, 2.0, 5.0]);
        let pade = solve(&c, 2, 0, &PadeOptions::default()).unwrap();
        assert_eq!(pade.numerator, vec![3.0, -1.0, 2.0]);
        assert_eq!(pade.denominator, vec![1.0]);
    }

    #[test]
    fn too_few_coefficients_is_rejected_before_solving() {
        let c = seq(&[1.0, 1.0, 0.5, 1.0 / 6.0]);
        let err = solve(&c, 2, 2, &PadeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ApproxError::DegreeConstraint {
                function: "test".to_string(),
                p: 2,
                q: 2,
                available: 4
            }
        );
    }

    #[test]
    fn singular_toeplitz_is_reported() {
        // sin about 0 has c_0 = 0, so the [0/1] system is [c_0] a_1 = -c_1.
        let c = coefficients(&TargetFunction::closed_form(FunctionKind::Sin), 0.0, 4).unwrap();
        match solve(&c, 0, 1, &PadeOptions::default()) {
            Err(ApproxError::SingularSystem(e)) => {
                assert_eq!((e.p, e.q), (0, 1));
                assert_eq!(e.function, "sin(x)");
                assert_eq!(e.rcond, 0.0);
            }
            other => panic!("expected singular system, got {other:?}"),
        }

        // Rank-deficient 2x2: [[1, 1], [1, 1]] from c = [1, 1, 1, 1, 1] with p = 1.
        let c = seq(&[1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(matches!(
            solve(&c, 1, 2, &PadeOptions::default()),
            Err(ApproxError::SingularSystem(_))
        ));
    }

    #[test]
    fn tolerance_is_tunable() {
        // [[1, 1], [1 + 1e-9, 1]] is nonsingular but badly conditioned.
        let c = seq(&[0.0, 1.0, 1.0, 1.0 + 1e-9, 2.0]);
        assert!(solve(&c, 2, 2, &PadeOptions { singular_rcond: 1e-12 }).is_ok());
        assert!(matches!(
            solve(&c, 2, 2, &PadeOptions { singular_rcond: 1e-6 }),
            Err(ApproxError::SingularSystem(_))
        ));
    }

    #[test]
    fn round_trip_reproduces_taylor_coefficients() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = rng.gen_range(1..=9);
            let c: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let c = seq(&c);
            for p in 0..n {
                for q in 0..(n - p) {
                    let Ok(pade) = solve(&c, p, q, &PadeOptions { singular_rcond: 1e-8 }) else {
                        continue;
                    };
                    // Huge denominators amplify rounding in the re-expansion.
                    if pade.denominator.iter().any(|a| a.abs() > 1e3) {
                        continue;
                    }
                    let back = taylor_expansion(&pade, p + q + 1);
                    for k in 0..=p + q {
                        let scale = 1.0 + c.coeffs[k].abs();
                        assert!(
                            (back[k] - c.coeffs[k]).abs() < 1e-6 * scale,
                            "[{p}/{q}] k={k}: {} vs {}",
                            back[k],
                            c.coeffs[k]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_for_registry_functions() {
        for kind in [FunctionKind::Exp, FunctionKind::Cos, FunctionKind::Atan, FunctionKind::Ln1p] {
            let c = coefficients(&TargetFunction::closed_form(kind), 0.0, 7).unwrap();
            for (p, q) in [(3, 3), (4, 2), (2, 4), (6, 0)] {
                let Ok(pade) = solve(&c, p, q, &PadeOptions::default()) else {
                    continue;
                };
                let back = taylor_expansion(&pade, p + q + 1);
                for k in 0..=p + q {
                    assert!((back[k] - c.coeffs[k]).abs() < 1e-10, "{kind:?} [{p}/{q}] k={k}");
                }
            }
        }
    }

    /// `(-1)^j (2m-j)! m! / ((2m)! j! (m-j)!)`, the denominator of exp's `[m/m]`.
    fn exp_diagonal_denominator(m: usize) -> Vec<f64> {
        let fact = |n: usize| (1..=n).map(|k| k as f64).product::<f64>();
        (0..=m)
            .map(|j| {
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * fact(2 * m - j) * fact(m) / (fact(2 * m) * fact(j) * fact(m - j))
            })
            .collect()
    }

    #[test]
    fn fast_decaying_series_is_not_mistaken_for_singular() {
        let exp = TargetFunction::closed_form(FunctionKind::Exp);
        for m in [7, 8] {
            let c = coefficients(&exp, 0.0, 2 * m + 1).unwrap();
            let pade = solve(&c, m, m, &PadeOptions::default()).unwrap();
            let expected = exp_diagonal_denominator(m);
            for (j, (a, e)) in pade.denominator.iter().zip(&expected).enumerate() {
                assert!((a - e).abs() <= 1e-7 * e.abs(), "[{m}/{m}] a_{j}: {a} vs {e}");
            }
            // Numerator of exp's [m/m] is the denominator with signs flipped on odd terms.
            for (j, (b, e)) in pade.numerator.iter().zip(&expected).enumerate() {
                let e = if j % 2 == 0 { *e } else { -*e };
                assert!((b - e).abs() <= 1e-7 * e.abs(), "[{m}/{m}] b_{j}: {b} vs {e}");
            }
        }
    }

    #[test]
    fn verdict_survives_a_change_of_variable() {
        // exp(4s) has coefficients 4^k / k!; same approximant up to t = 4s.
        let exp = TargetFunction::closed_form(FunctionKind::Exp);
        let c = coefficients(&exp, 0.0, 15).unwrap();
        let stretched = seq(&c.coeffs.iter().zip(0_i32..).map(|(v, k)| v * 4f64.powi(k)).collect::<Vec<_>>());
        let opts = PadeOptions::default();
        let a = solve(&c, 7, 7, &opts).unwrap();
        let b = solve(&stretched, 7, 7, &opts).unwrap();
        for (j, (x, y)) in a.denominator.iter().zip(&b.denominator).enumerate() {
            let unscaled = y / 4f64.powi(j as i32);
            assert!((x - unscaled).abs() <= 1e-7 * x.abs(), "a_{j}: {x} vs {unscaled}");
        }
    }

    #[test]
    fn rescale_balances_end_coefficients() {
        let (scaled, rho) = rescale(&[2.0, 0.0, 0.5]);
        assert!((rho - 2.0).abs() < 1e-15);
        assert!((scaled[2] - 2.0).abs() < 1e-15, "{scaled:?}");

        // A single nonzero coefficient leaves nothing to balance.
        assert_eq!(rescale(&[0.0, 3.0, 0.0]), (vec![0.0, 3.0, 0.0], 1.0));
    }
}
