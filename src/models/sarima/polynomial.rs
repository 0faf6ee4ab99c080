//! Lag-polynomial arithmetic for multiplicative seasonal models.
//!
//! Every polynomial is a coefficient vector in powers of the backshift
//! operator `B`, constant term first.

/// Product of two lag polynomials.
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut product = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            product[i + j] += x * y;
        }
    }
    product
}

/// `1 + sign * Σ c_i B^{i·step}`.
pub fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] += sign * c;
    }
    poly
}

/// Expanded AR operator `(1 - Σ φ_i B^i)(1 - Σ Φ_j B^{j·s})`.
pub fn ar_operator(ar: &[f64], seasonal_ar: &[f64], period: usize) -> Vec<f64> {
    multiply(
        &lag_polynomial(ar, 1, -1.0),
        &lag_polynomial(seasonal_ar, period, -1.0),
    )
}

/// Expanded MA operator `(1 + Σ θ_i B^i)(1 + Σ Θ_j B^{j·s})`.
pub fn ma_operator(ma: &[f64], seasonal_ma: &[f64], period: usize) -> Vec<f64> {
    multiply(
        &lag_polynomial(ma, 1, 1.0),
        &lag_polynomial(seasonal_ma, period, 1.0),
    )
}

/// Whether `1 - Σ φ_i z^i` has every root outside the unit circle.
///
/// Runs the Durbin-Levinson recursion backwards: the process is stationary
/// iff every partial autocorrelation has magnitude below one.
pub fn is_stationary(phi: &[f64]) -> bool {
    let mut coeffs = phi.to_vec();
    while let Some(&kappa) = coeffs.last() {
        if !kappa.is_finite() || kappa.abs() >= 1.0 {
            return false;
        }
        let m = coeffs.len();
        let denom = 1.0 - kappa * kappa;
        coeffs = (0..m - 1)
            .map(|i| (coeffs[i] + kappa * coeffs[m - 2 - i]) / denom)
            .collect();
    }
    true
}

/// Whether `1 + Σ θ_i z^i` has every root outside the unit circle.
pub fn is_invertible(theta: &[f64]) -> bool {
    let negated: Vec<f64> = theta.iter().map(|t| -t).collect();
    is_stationary(&negated)
}

/// First `n` ψ-weights of `ma(B) / ar(B)`.
///
/// Both operators carry their constant term; `ar[0]` must be one.
pub fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(n);
    for j in 0..n {
        let mut value = ma.get(j).copied().unwrap_or(0.0);
        for k in 1..=j.min(ar.len().saturating_sub(1)) {
            value -= ar[k] * psi[j - k];
        }
        psi.push(value);
    }
    psi
}
