//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs the approximation pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::cli::{Command, CommonArgs, PlotArgs, ViewArgs};
use crate::compare::grid::build_requests;
use crate::domain::{ApproxRequest, DomainSpec, FunctionKind, RunConfig, SampleSet};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `approx` binary.
pub fn run() -> Result<(), AppError> {
    // Must run before parsing so clap's `env` attributes see `.env` values.
    let dotenv = dotenvy::dotenv();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.log_level);
    if let Err(e) = dotenv {
        if !e.not_found() {
            log::warn!("Ignoring unreadable .env file: {e}");
        }
    }

    match cli.command {
        Command::Taylor(args) => handle_run(
            &args.common,
            vec![ApproxRequest::Taylor { order: args.order }],
            OutputMode::Single,
        ),
        Command::Pade(args) => handle_run(
            &args.common,
            vec![ApproxRequest::Pade { p: args.p, q: args.q }],
            OutputMode::Single,
        ),
        Command::Compare(args) => handle_run(
            &args.common,
            build_requests(&args.orders, &args.pade),
            OutputMode::Comparison,
        ),
        Command::Plot(args) => handle_plot(args),
        Command::Functions => {
            print!("{}", crate::report::format_function_list());
            Ok(())
        }
    }
}

fn init_logging(level: LevelFilter) {
    // `RUST_LOG` wins over `--log` when both are given.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Single,
    Comparison,
}

fn handle_run(common: &CommonArgs, requests: Vec<ApproxRequest>, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(common, requests)?;
    let run = pipeline::run(&config)?;

    // Print terminal output.
    print!(
        "{}",
        crate::report::format_run_header(run.target.name(), config.center, &config.domain)
    );
    println!();
    match mode {
        OutputMode::Single => {
            for r in &run.comparison.results {
                println!("{}", crate::report::format_approximant_report(&r.approximant, &r.samples));
            }
        }
        OutputMode::Comparison => {
            println!("{}", crate::report::format_comparison_summary(&run.comparison));
        }
    }

    let sets = run.sample_sets();
    render_plots(&PlotView::from_config(&config), &sets, run.target.name())?;

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_samples_csv(path, &sets)?;
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::build_run_file(
            config.function,
            config.center,
            config.domain,
            run.comparison.results.iter().map(|r| r.approximant.clone()).collect(),
        );
        crate::io::write_run_json(path, &file)?;
    }
    if config.debug_bundle {
        let path = crate::debug::write_debug_bundle(&config, &run)?;
        println!("Debug bundle written to {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_run_json(&args.input)?;
    let sets = pipeline::replay(&file, args.pole_tol)?;

    print!(
        "{}",
        crate::report::format_run_header(file.function.display_name(), file.center, &file.domain)
    );
    println!("Generated by {} at {}\n", file.tool, file.generated_at.to_rfc3339());
    for (approximant, set) in file.approximants.iter().zip(&sets) {
        println!("{}", crate::report::format_equation(approximant));
        print!("{}", crate::report::format_quality(&set.quality()));
    }
    println!();

    let view = PlotView::from_args(&args.view, file.function)?;
    render_plots(&view, &sets, file.function.display_name())
}

/// Build the pipeline configuration from parsed flags.
pub fn run_config_from_args(common: &CommonArgs, requests: Vec<ApproxRequest>) -> Result<RunConfig, AppError> {
    let view = PlotView::from_args(&common.view, common.function)?;
    Ok(RunConfig {
        function: common.function,
        strategy: common.strategy,
        center: common.center,
        requests,
        domain: DomainSpec {
            x_min: common.x_min,
            x_max: common.x_max,
            points: common.points,
        },
        singular_rcond: common.tolerances.singular_rcond,
        pole_tol: common.tolerances.pole_tol,
        max_numeric_order: common.tolerances.max_numeric_order,
        plot: view.plot,
        plot_width: view.width,
        plot_height: view.height,
        y_range: view.y_range,
        trig_axis: view.trig_axis,
        svg: view.svg,
        export_json: common.export_json.clone(),
        export_csv: common.export_csv.clone(),
        debug_bundle: common.debug_bundle,
    })
}

/// Resolved plot settings, shared by fresh runs and replays.
struct PlotView {
    plot: bool,
    width: usize,
    height: usize,
    y_range: Option<(f64, f64)>,
    trig_axis: bool,
    svg: Option<PathBuf>,
}

impl PlotView {
    fn from_args(view: &ViewArgs, function: FunctionKind) -> Result<Self, AppError> {
        let y_range = match (view.y_min, view.y_max) {
            (None, None) => None,
            (Some(lo), Some(hi)) if lo.is_finite() && hi.is_finite() && hi > lo => Some((lo, hi)),
            (Some(lo), Some(hi)) => {
                return Err(AppError::new(
                    2,
                    format!("Invalid y-range: y_min={lo}, y_max={hi} (must be finite and y_max>y_min)."),
                ));
            }
            _ => return Err(AppError::new(2, "--y-min and --y-max must be given together.")),
        };
        let trig_axis = if view.trig {
            true
        } else if view.no_trig {
            false
        } else {
            function.is_trigonometric()
        };
        Ok(Self {
            plot: view.plot && !view.no_plot,
            width: view.width,
            height: view.height,
            y_range,
            trig_axis,
            svg: view.svg.clone(),
        })
    }

    fn from_config(config: &RunConfig) -> Self {
        Self {
            plot: config.plot,
            width: config.plot_width,
            height: config.plot_height,
            y_range: config.y_range,
            trig_axis: config.trig_axis,
            svg: config.svg.clone(),
        }
    }
}

fn render_plots(view: &PlotView, sets: &[SampleSet], truth_label: &str) -> Result<(), AppError> {
    if view.plot {
        let plot = crate::plot::render_ascii_plot(sets, truth_label, view.width, view.height, view.y_range);
        println!("{plot}");
    }
    if let Some(path) = &view.svg {
        let chart = crate::plot::SvgChart {
            title: format!("{truth_label} and its approximants"),
            truth_label,
            sets,
            size: (1000, 700),
            y_range: view.y_range,
            trig_axis: view.trig_axis,
        };
        crate::plot::write_svg(path, &chart)?;
    }
    Ok(())
}
