//! Command-line parsing for the Taylor/Padé approximation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the approximation engine.

use std::f64::consts::PI;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::compare::grid::parse_pade_pair;
use crate::domain::{FunctionKind, Strategy};
use crate::math::eval::DEFAULT_POLE_TOL;
use crate::math::pade::DEFAULT_SINGULAR_RCOND;
use crate::math::series::DEFAULT_MAX_NUMERIC_ORDER;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "approx", version, about = "Taylor and Pade approximants of analytic functions")]
pub struct Cli {
    /// Log level (overridden by RUST_LOG).
    #[arg(long = "log", global = true, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Truncated Taylor series of a function about a point.
    Taylor(TaylorArgs),
    /// Pade approximant of degrees (p, q) built from the Taylor series.
    Pade(PadeArgs),
    /// Compare several Taylor orders and Pade pairs over one domain.
    Compare(CompareArgs),
    /// Re-plot a run saved with `--export-json`.
    Plot(PlotArgs),
    /// List the built-in functions.
    Functions,
}

#[derive(Debug, Parser, Clone)]
pub struct TaylorArgs {
    /// Number of coefficients N (polynomial degree N-1).
    #[arg(short = 'n', long, default_value_t = 5)]
    pub order: usize,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct PadeArgs {
    /// Numerator degree.
    #[arg(short = 'p', long, default_value_t = 3)]
    pub p: usize,

    /// Denominator degree.
    #[arg(short = 'q', long, default_value_t = 2)]
    pub q: usize,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    /// Taylor coefficient counts N to compare.
    #[arg(long, value_delimiter = ',', default_values_t = [2, 4, 6, 8])]
    pub orders: Vec<usize>,

    /// Pade degree pairs, written p/q.
    #[arg(
        long = "pade",
        value_delimiter = ',',
        value_parser = parse_pade_pair,
        default_values = ["1/1", "2/2", "3/2"]
    )]
    pub pade: Vec<(usize, usize)>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by every computing subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Function to approximate.
    #[arg(short = 'f', long, value_enum, default_value_t = FunctionKind::Sin)]
    pub function: FunctionKind,

    /// Expansion point a.
    #[arg(short = 'a', long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub center: f64,

    /// How Taylor coefficients are derived.
    #[arg(long, value_enum, default_value_t = Strategy::ClosedForm)]
    pub strategy: Strategy,

    /// Left end of the evaluation domain.
    #[arg(long, default_value_t = -PI, allow_hyphen_values = true)]
    pub x_min: f64,

    /// Right end of the evaluation domain.
    #[arg(long, default_value_t = PI, allow_hyphen_values = true)]
    pub x_max: f64,

    /// Number of evaluation points.
    #[arg(long, default_value_t = 400)]
    pub points: usize,

    #[command(flatten)]
    pub tolerances: ToleranceArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Export every sample to CSV.
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Export the run (approximants + domain) to JSON.
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Write a markdown debug bundle under ./debug.
    #[arg(long)]
    pub debug_bundle: bool,
}

/// Numerical tolerances. Each can also come from the environment or `.env`.
#[derive(Debug, Args, Clone)]
pub struct ToleranceArgs {
    /// Reciprocal condition number below which a Pade system is singular.
    #[arg(long, env = "APPROX_SINGULAR_RCOND", default_value_t = DEFAULT_SINGULAR_RCOND)]
    pub singular_rcond: f64,

    /// Relative denominator size below which a Pade sample is a pole.
    #[arg(long, env = "APPROX_POLE_TOL", default_value_t = DEFAULT_POLE_TOL)]
    pub pole_tol: f64,

    /// Highest derivative order attempted by numeric differentiation.
    #[arg(long, env = "APPROX_MAX_NUMERIC_ORDER", default_value_t = DEFAULT_MAX_NUMERIC_ORDER)]
    pub max_numeric_order: usize,
}

/// Plot options.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also render an SVG chart to this path.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Lower y limit of the plots.
    #[arg(long, allow_hyphen_values = true)]
    pub y_min: Option<f64>,

    /// Upper y limit of the plots.
    #[arg(long, allow_hyphen_values = true)]
    pub y_max: Option<f64>,

    /// Label x ticks in multiples of π (default for sin, cos, tan).
    #[arg(long, conflicts_with = "no_trig")]
    pub trig: bool,

    /// Plain decimal x ticks even for trigonometric functions.
    #[arg(long)]
    pub no_trig: bool,
}

/// Options for plotting a saved run.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Run JSON file produced by `--export-json`.
    #[arg(long, value_name = "JSON")]
    pub input: PathBuf,

    #[arg(long, env = "APPROX_POLE_TOL", default_value_t = DEFAULT_POLE_TOL)]
    pub pole_tol: f64,

    #[command(flatten)]
    pub view: ViewArgs,
}
