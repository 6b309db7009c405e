//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the function registry (`FunctionKind`) and derivation strategy (`Strategy`)
//! - approximant coefficient sets (`CoefficientSequence`, `PadeCoefficients`, `Approximant`)
//! - evaluation outputs (`Sample`, `SampleSet`, `ApproxQuality`)
//! - run configuration and the saved run file

pub mod types;

pub use types::*;
