//! The approximation engine.
//!
//! - `series_ops`: truncated power-series arithmetic
//! - `series`: Taylor coefficient derivation (closed-form or numeric)
//! - `pade`: Padé coefficients from Taylor coefficients
//! - `eval`: evaluation of either approximant over a domain
//!
//! Everything here is pure: no I/O, no shared state.

pub mod eval;
pub mod pade;
pub mod series;
pub mod series_ops;

pub use eval::{EvalOptions, evaluate, evaluate_fn};
pub use pade::{PadeOptions, solve as solve_pade};
pub use series::{SeriesOptions, TargetFunction, coefficients, coefficients_with};

/// All engine tolerances in one place.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub series: SeriesOptions,
    pub pade: PadeOptions,
    pub eval: EvalOptions,
}
