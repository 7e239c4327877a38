/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
///
/// Summation runs in slice order so repeated runs produce identical bits.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to `decimals` places, exact ties going to the even digit.
///
/// Matches the published artifacts, where 9 / 4 at one place is 2.2.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// `part / whole`, or 0.0 when there is nothing to divide by.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
