//! Evaluation grids and degree lists.
//!
//! Domains are linearly spaced, endpoints included, so that a run is fully
//! determined by `(x_min, x_max, points)` and can be rebuilt from a saved file.

use crate::domain::{ApproxRequest, DomainSpec};
use crate::error::AppError;

/// Generate `points` linearly spaced values between `min` and `max` (inclusive).
pub fn linspace(min: f64, max: f64, points: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::new(
            2,
            format!("Invalid domain: x_min={min}, x_max={max} (must be finite and x_max>x_min)."),
        ));
    }
    if points < 2 {
        return Err(AppError::new(2, "Domain points must be >= 2."));
    }

    let step = (max - min) / (points as f64 - 1.0);
    let mut out = Vec::with_capacity(points);
    for i in 0..points - 1 {
        out.push(min + step * i as f64);
    }
    // Land exactly on the right endpoint.
    out.push(max);
    Ok(out)
}

/// The sample points described by `spec`.
pub fn domain_points(spec: &DomainSpec) -> Result<Vec<f64>, AppError> {
    linspace(spec.x_min, spec.x_max, spec.points)
}

/// Parse a Padé degree pair written as `p/q`.
pub fn parse_pade_pair(s: &str) -> Result<(usize, usize), String> {
    let (p, q) = s
        .split_once('/')
        .ok_or_else(|| format!("expected p/q, got '{s}'"))?;
    let p = p
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid numerator degree '{p}': {e}"))?;
    let q = q
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid denominator degree '{q}': {e}"))?;
    Ok((p, q))
}

/// Taylor requests (by coefficient count `N`) followed by Padé pairs.
pub fn build_requests(taylor_orders: &[usize], pade_pairs: &[(usize, usize)]) -> Vec<ApproxRequest> {
    taylor_orders
        .iter()
        .map(|&order| ApproxRequest::Taylor { order })
        .chain(pade_pairs.iter().map(|&(p, q)| ApproxRequest::Pade { p, q }))
        .collect()
}
