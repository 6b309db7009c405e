//! Convergence comparison across approximants.
//!
//! Given one target function, one expansion point and one domain we:
//! - derive Taylor coefficients once, for the largest order any request needs
//! - build each requested approximant from a prefix of those coefficients
//! - evaluate every approximant over the domain (parallel, order-preserving)
//! - rank them by maximum absolute error
//!
//! Requests that fail (e.g. a singular Padé system) are skipped and reported,
//! not fatal, unless nothing at all could be built.

use rayon::prelude::*;

use crate::domain::{
    Approximant, ApproxQuality, ApproxRequest, CoefficientSequence, SampleSet,
};
use crate::error::ApproxError;
use crate::math::{EngineOptions, TargetFunction, coefficients_with, evaluate, solve_pade};

/// One built and evaluated approximant.
#[derive(Debug, Clone)]
pub struct ApproxResult {
    pub request: ApproxRequest,
    pub approximant: Approximant,
    pub samples: SampleSet,
    pub quality: ApproxQuality,
}

/// Output of a comparison run.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub function: String,
    pub center: f64,
    /// Taylor coefficients shared by all requests.
    pub taylor: CoefficientSequence,
    /// Successful approximants, in request order.
    pub results: Vec<ApproxResult>,
    /// Requests that could not be built and why.
    pub skipped: Vec<(ApproxRequest, ApproxError)>,
    /// Index into `results` of the approximant with the smallest maximum error.
    pub best: usize,
}

impl Comparison {
    pub fn best(&self) -> &ApproxResult {
        &self.results[self.best]
    }
}

/// Build one approximant from (a prefix of) `taylor`.
pub fn build_approximant(
    taylor: &CoefficientSequence,
    request: ApproxRequest,
    opts: &EngineOptions,
) -> Result<Approximant, ApproxError> {
    match request {
        ApproxRequest::Taylor { order } => {
            if order == 0 {
                return Err(ApproxError::InvalidInput(format!(
                    "Taylor order N must be >= 1 for {}.",
                    taylor.function
                )));
            }
            if order > taylor.order() {
                return Err(ApproxError::InvalidInput(format!(
                    "Taylor order {order} exceeds the {} derived coefficients of {}",
                    taylor.order(),
                    taylor.function
                )));
            }
            Ok(Approximant::Taylor(taylor.truncated(order)))
        }
        ApproxRequest::Pade { p, q } => Ok(Approximant::Pade(solve_pade(taylor, p, q, &opts.pade)?)),
    }
}

/// Build and evaluate every request against `target` over `domain`.
pub fn run_comparison(
    target: &TargetFunction,
    center: f64,
    requests: &[ApproxRequest],
    domain: &[f64],
    opts: &EngineOptions,
) -> Result<Comparison, ApproxError> {
    if requests.is_empty() {
        return Err(ApproxError::InvalidInput(format!(
            "No approximants requested for {}.",
            target.name()
        )));
    }
    if domain.is_empty() {
        return Err(ApproxError::InvalidInput(format!(
            "Evaluation domain for {} is empty.",
            target.name()
        )));
    }
    opts.eval.validate()?;

    let n = requests
        .iter()
        .map(|r| r.coefficients_needed())
        .max()
        .unwrap_or(1)
        .max(1);
    let taylor = coefficients_with(target, center, n, &opts.series)?;

    // Each request only reads shared inputs, so they fan out freely.
    let outcomes: Vec<(ApproxRequest, Result<ApproxResult, ApproxError>)> = requests
        .par_iter()
        .map(|&request| {
            let outcome = build_approximant(&taylor, request, opts).map(|approximant| {
                let samples = evaluate(&approximant, target, domain, &opts.eval);
                let quality = samples.quality();
                ApproxResult {
                    request,
                    approximant,
                    samples,
                    quality,
                }
            });
            (request, outcome)
        })
        .collect();

    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for (request, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) => {
                log::warn!("Skipping {request}: {err}");
                skipped.push((request, err));
            }
        }
    }

    if results.is_empty() {
        // Nothing to compare: surface the first failure as the run's error.
        let (_, err) = skipped.swap_remove(0);
        return Err(err);
    }

    let best = select_best(&results);
    log::info!(
        "{} about a={center}: best of {} approximant(s) is {}",
        target.name(),
        results.len(),
        results[best].approximant.label()
    );

    Ok(Comparison {
        function: target.name().to_string(),
        center,
        taylor,
        results,
        skipped,
        best,
    })
}

/// Deterministic selection: minimum max-error; NaN ranks last; ties keep the earlier request.
fn select_best(results: &[ApproxResult]) -> usize {
    let key = |r: &ApproxResult| {
        let e = r.quality.max_abs_err;
        if e.is_finite() { e } else { f64::INFINITY }
    };
    let mut best = 0;
    for (i, r) in results.iter().enumerate().skip(1) {
        if key(r) < key(&results[best]) {
            best = i;
        }
    }
    best
}
