/// Pearson correlation coefficient of two equal-length series.
///
/// Returns `None` when the coefficient is undefined: fewer than two
/// points, mismatched lengths, zero variance on either side, or a
/// non-finite result.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Some(r)
    } else {
        None
    }
}

/// Heavy-over-light ratio of summed isotopomer intensities.
///
/// A single zero intensity on a side zeroes that side's total, and the
/// ratio is only defined when both totals end up nonzero.
pub fn h_to_l_ratio(light: &[f64], heavy: &[f64]) -> Option<f64> {
    let side_total = |values: &[f64]| -> f64 {
        if values.is_empty() || values.iter().any(|&v| v == 0.0) {
            0.0
        } else {
            values.iter().sum()
        }
    };
    let light_total = side_total(light);
    let heavy_total = side_total(heavy);
    if light_total == 0.0 || heavy_total == 0.0 {
        None
    } else {
        Some(heavy_total / light_total)
    }
}
