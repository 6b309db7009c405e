//! Plotting.
//!
//! - `ascii`: fixed-size terminal plot (deterministic, snapshot-tested)
//! - `svg`: Plotters chart written to disk

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_plot;
pub use svg::{SvgChart, write_svg};
