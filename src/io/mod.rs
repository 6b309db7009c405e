//! Input/output helpers.
//!
//! - run JSON read/write (`run_file`)
//! - sample exports (CSV) (`export`)

pub mod export;
pub mod run_file;

pub use export::*;
pub use run_file::*;
