//! `pade-taylor` library crate.
//!
//! The binary (`approx`) is a thin wrapper around this library so that:
//!
//! - the approximation engine is testable without spawning processes
//! - the engine (`math`) is usable on its own, with caller-supplied functions
//! - presentation layers (report, plot, io) stay separate from the numerics

pub mod app;
pub mod cli;
pub mod compare;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
