//! Formatted terminal output: equations, coefficient tables and comparison summaries.
//!
//! We keep formatting code in one place so:
//! - the engine stays free of presentation concerns
//! - output changes are localized (the snapshot tests below pin them)

use clap::ValueEnum;

use crate::compare::Comparison;
use crate::domain::{
    Approximant, ApproxQuality, CoefficientSequence, DomainSpec, FunctionKind, PadeCoefficients, SampleSet,
};

/// `Taylor series expansion at x=a: <polynomial>`.
pub fn format_taylor_equation(seq: &CoefficientSequence) -> String {
    format!(
        "Taylor series expansion at x={}: {}",
        fmt_num(seq.center),
        format_polynomial(&seq.coeffs, seq.center)
    )
}

/// `Pade Approximation (M=p, N=q) at x=a: (<numerator>) / (<denominator>)`.
pub fn format_pade_equation(pade: &PadeCoefficients) -> String {
    format!(
        "Pade Approximation (M={}, N={}) at x={}: ({}) / ({})",
        pade.p(),
        pade.q(),
        fmt_num(pade.center),
        format_polynomial(&pade.numerator, pade.center),
        format_polynomial(&pade.denominator, pade.center)
    )
}

pub fn format_equation(approximant: &Approximant) -> String {
    match approximant {
        Approximant::Taylor(seq) => format_taylor_equation(seq),
        Approximant::Pade(pade) => format_pade_equation(pade),
    }
}

/// Render `Σ c_k t^k` with `t = x - a`, skipping zero terms.
pub fn format_polynomial(coeffs: &[f64], center: f64) -> String {
    let var = if center == 0.0 {
        "x".to_string()
    } else if center > 0.0 {
        format!("(x - {})", fmt_num(center))
    } else {
        format!("(x + {})", fmt_num(-center))
    };

    let mut out = String::new();
    for (k, &c) in coeffs.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let term = match k {
            0 => fmt_coef(c.abs()),
            1 => format!("{}*{var}", fmt_coef(c.abs())),
            _ => format!("{}*{var}^{k}", fmt_coef(c.abs())),
        };
        if out.is_empty() {
            if c < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(if c < 0.0 { " - " } else { " + " });
        }
        out.push_str(&term);
    }

    if out.is_empty() { "0".to_string() } else { out }
}

/// One row per coefficient index: `k`, Taylor `c_k` or Padé `b_k` / `a_k`.
pub fn format_coefficient_table(approximant: &Approximant) -> String {
    let mut out = String::new();
    match approximant {
        Approximant::Taylor(seq) => {
            out.push_str(&format!("{:>4} {:>16}\n", "k", "c_k"));
            out.push_str(&format!("{:-<4} {:-<16}\n", "", ""));
            for (k, c) in seq.coeffs.iter().enumerate() {
                out.push_str(&format!("{k:>4} {c:>16.9e}\n"));
            }
        }
        Approximant::Pade(pade) => {
            out.push_str(&format!("{:>4} {:>16} {:>16}\n", "k", "b_k", "a_k"));
            out.push_str(&format!("{:-<4} {:-<16} {:-<16}\n", "", "", ""));
            let rows = pade.numerator.len().max(pade.denominator.len());
            for k in 0..rows {
                let b = pade.numerator.get(k).map(|v| format!("{v:.9e}")).unwrap_or_default();
                let a = pade.denominator.get(k).map(|v| format!("{v:.9e}")).unwrap_or_default();
                out.push_str(format!("{k:>4} {b:>16} {a:>16}").trim_end());
                out.push('\n');
            }
        }
    }
    out
}

/// Run header shared by all subcommands.
pub fn format_run_header(function: &str, center: f64, domain: &DomainSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== approx - {function} about a={} ===\n", fmt_num(center)));
    out.push_str(&format!(
        "Domain: [{:.6}, {:.6}], {} points\n",
        domain.x_min, domain.x_max, domain.points
    ));
    out
}

/// Ranked error table for a comparison run. `*` marks the best approximant.
pub fn format_comparison_summary(cmp: &Comparison) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Taylor coefficients (N={}): {}\n",
        cmp.taylor.order(),
        fmt_vec(&cmp.taylor.coeffs)
    ));

    out.push_str("\nApproximant diagnostics:\n");
    for (i, r) in cmp.results.iter().enumerate() {
        let chosen = if i == cmp.best { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<14} max|err|={:.3e} RMSE={:.3e} poles={}\n",
            r.approximant.label(),
            r.quality.max_abs_err,
            r.quality.rmse,
            r.quality.n_undefined
        ));
    }
    for (request, reason) in &cmp.skipped {
        out.push_str(&format!("  (skipped {request}) {reason}\n"));
    }

    out.push_str(&format!("\nBest: {}\n", cmp.best().approximant.label()));
    out
}

/// Equation, coefficient table and error statistics of one approximant.
pub fn format_approximant_report(approximant: &Approximant, samples: &SampleSet) -> String {
    let mut out = String::new();
    out.push_str(&format_equation(approximant));
    out.push_str("\n\n");
    out.push_str(&format_coefficient_table(approximant));
    out.push('\n');
    out.push_str(&format_quality(&samples.quality()));

    let poles = samples.undefined();
    if !poles.is_empty() {
        let xs: Vec<String> = poles.iter().take(5).map(|p| format!("{:.6}", p.x)).collect();
        let more = if poles.len() > 5 { ", ..." } else { "" };
        out.push_str(&format!("Undefined at x = {}{more}\n", xs.join(", ")));
    }
    out
}

pub fn format_quality(q: &ApproxQuality) -> String {
    format!(
        "max|err|={:.3e} RMSE={:.3e} defined={} poles={}\n",
        q.max_abs_err, q.rmse, q.n_defined, q.n_undefined
    )
}

/// Table of the built-in functions and where they may be expanded.
pub fn format_function_list() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:<10} {}\n", "name", "function", "expansion point"));
    out.push_str(&format!("{:-<8} {:-<10} {:-<15}\n", "", "", ""));
    for kind in FunctionKind::ALL {
        let name = kind
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        out.push_str(&format!("{name:<8} {:<10} {}\n", kind.display_name(), kind.expansion_domain()));
    }
    out
}

pub fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_coef(c: f64) -> String {
    if c != 0.0 && !(1e-3..1e6).contains(&c) {
        format!("{c:.6e}")
    } else {
        format!("{c:.6}")
    }
}

/// Shortest exact-looking rendering for centers (`0`, `1.5`, `-2`).
fn fmt_num(v: f64) -> String {
    format!("{v}")
}
