//! Truncated power-series arithmetic.
//!
//! Convention: `c[k] = f^(k)(a) / k!`, i.e. coefficients of `Σ c_k t^k` with
//! `t = x - a`. Every operation returns a fresh `Vec` whose length equals the
//! length of the first input (the truncation order).
//!
//! The transcendental recurrences use the logarithmic-derivative technique:
//! for `g = φ(u)` with `g' = φ'(u) u'`, matching coefficients of `t^(k-1)` gives
//! a recurrence that only needs previously computed terms.

/// Evaluate `Σ c_k t^k` by Horner's rule.
pub fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Horner evaluation of `Σ |c_k| |t|^k`, the magnitude scale of [`horner`].
pub fn horner_abs(coeffs: &[f64], t: f64) -> f64 {
    let t = t.abs();
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c.abs())
}

/// The series of `x` about `a`: `[a, 1, 0, …]` truncated to `n` terms.
pub fn identity(a: f64, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    if n > 0 {
        out[0] = a;
    }
    if n > 1 {
        out[1] = 1.0;
    }
    out
}

/// Zero-pad (or truncate) `coeffs` to exactly `n` terms.
pub fn padded(coeffs: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    for (dst, &src) in out.iter_mut().zip(coeffs) {
        *dst = src;
    }
    out
}

/// Cauchy product `a * b`.
pub fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len();
    let b = padded(b, n);
    (0..n)
        .map(|k| (0..=k).map(|j| a[j] * b[k - j]).sum::<f64>())
        .collect()
}

/// Recursive division `a / b`.
///
/// `c[k] = (a[k] - Σ_{j=1}^{k} b[j] c[k-j]) / b[0]`
///
/// The caller is responsible for `b[0] != 0`.
pub fn div(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len();
    if n == 0 {
        return Vec::new();
    }
    let b = padded(b, n);
    let inv_b0 = 1.0 / b[0];
    let mut c = vec![0.0; n];
    for k in 0..n {
        let mut sum = a[k];
        for j in 1..=k {
            sum -= b[j] * c[k - j];
        }
        c[k] = sum * inv_b0;
    }
    c
}

/// Reciprocal `1 / a`. The caller is responsible for `a[0] != 0`.
pub fn recip(a: &[f64]) -> Vec<f64> {
    let mut one = vec![0.0; a.len()];
    if let Some(first) = one.first_mut() {
        *first = 1.0;
    }
    div(&one, a)
}

/// `exp(a)`
///
/// `c[k] = (1/k) Σ_{j=1}^{k} j a[j] c[k-j]`
pub fn exp(a: &[f64]) -> Vec<f64> {
    let n = a.len();
    let mut c = vec![0.0; n];
    if n == 0 {
        return c;
    }
    c[0] = a[0].exp();
    for k in 1..n {
        let mut sum = 0.0;
        for j in 1..=k {
            sum += j as f64 * a[j] * c[k - j];
        }
        c[k] = sum / k as f64;
    }
    c
}

/// `ln(a)`, requires `a[0] > 0`.
///
/// `c[k] = (a[k] - (1/k) Σ_{j=1}^{k-1} j c[j] a[k-j]) / a[0]`
pub fn ln(a: &[f64]) -> Vec<f64> {
    let n = a.len();
    let mut c = vec![0.0; n];
    if n == 0 {
        return c;
    }
    let inv_a0 = 1.0 / a[0];
    c[0] = a[0].ln();
    for k in 1..n {
        let mut sum = 0.0;
        for j in 1..k {
            sum += j as f64 * c[j] * a[k - j];
        }
        c[k] = (a[k] - sum / k as f64) * inv_a0;
    }
    c
}

/// `sqrt(a)`, requires `a[0] > 0`.
///
/// `c[k] = (a[k] - Σ_{j=1}^{k-1} c[j] c[k-j]) / (2 c[0])`
pub fn sqrt(a: &[f64]) -> Vec<f64> {
    let n = a.len();
    let mut c = vec![0.0; n];
    if n == 0 {
        return c;
    }
    c[0] = a[0].sqrt();
    let two_c0 = 2.0 * c[0];
    for k in 1..n {
        let mut sum = 0.0;
        for j in 1..k {
            sum += c[j] * c[k - j];
        }
        c[k] = (a[k] - sum) / two_c0;
    }
    c
}

/// `(sin(a), cos(a))` via the coupled recurrence.
pub fn sin_cos(a: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = a.len();
    let mut s = vec![0.0; n];
    let mut co = vec![0.0; n];
    if n == 0 {
        return (s, co);
    }
    (s[0], co[0]) = a[0].sin_cos();
    for k in 1..n {
        let mut sum_s = 0.0;
        let mut sum_c = 0.0;
        for j in 1..=k {
            let ja = j as f64 * a[j];
            sum_s += ja * co[k - j];
            sum_c += ja * s[k - j];
        }
        s[k] = sum_s / k as f64;
        co[k] = -sum_c / k as f64;
    }
    (s, co)
}

/// `(sinh(a), cosh(a))` via the coupled recurrence (positive signs).
pub fn sinh_cosh(a: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = a.len();
    let mut sh = vec![0.0; n];
    let mut ch = vec![0.0; n];
    if n == 0 {
        return (sh, ch);
    }
    sh[0] = a[0].sinh();
    ch[0] = a[0].cosh();
    for k in 1..n {
        let mut sum_sh = 0.0;
        let mut sum_ch = 0.0;
        for j in 1..=k {
            let ja = j as f64 * a[j];
            sum_sh += ja * ch[k - j];
            sum_ch += ja * sh[k - j];
        }
        sh[k] = sum_sh / k as f64;
        ch[k] = sum_ch / k as f64;
    }
    (sh, ch)
}

/// Antiderivative with constant term `c0`, truncated to `n` terms.
pub fn integrate(a: &[f64], c0: f64, n: usize) -> Vec<f64> {
    let mut c = vec![0.0; n];
    if n == 0 {
        return c;
    }
    c[0] = c0;
    for k in 1..n {
        c[k] = a.get(k - 1).copied().unwrap_or(0.0) / k as f64;
    }
    c
}
