//! Reporting utilities: equation display, coefficient tables, comparison summaries.

pub mod format;

pub use format::*;
