//! Small statistics helpers shared by the pattern analyzer, anomaly
//! detector, and prediction engine.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

pub fn stddev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Least-squares slope of `values` against their index, used to detect
/// trending patterns.
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let x_mean = mean(&xs);
    let y_mean = mean(values);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..n {
        numerator += (xs[i] - x_mean) * (values[i] - y_mean);
        denominator += (xs[i] - x_mean).powi(2);
    }
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Pearson correlation coefficient between two equal-length series.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let a_mean = mean(a);
    let b_mean = mean(b);
    let mut numerator = 0.0;
    let mut a_sq = 0.0;
    let mut b_sq = 0.0;
    for i in 0..a.len() {
        let da = a[i] - a_mean;
        let db = b[i] - b_mean;
        numerator += da * db;
        a_sq += da * da;
        b_sq += db * db;
    }
    let denominator = (a_sq * b_sq).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Scales a raw confidence value by the sample-size bucket it falls into:
/// `>=30` full weight, `10..30` medium (`0.7`), `<10` low (`0.4`).
pub fn sample_size_confidence_factor(sample_count: usize) -> f64 {
    if sample_count >= 30 {
        1.0
    } else if sample_count >= 10 {
        0.7
    } else {
        0.4
    }
}
