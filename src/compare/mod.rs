//! Convergence comparison of several approximants of one function.
//!
//! - `grid`: evaluation domains and degree-list parsing
//! - `sweep`: build, evaluate and rank a set of requested approximants

pub mod grid;
pub mod sweep;

pub use sweep::{ApproxResult, Comparison, build_approximant, run_comparison};
