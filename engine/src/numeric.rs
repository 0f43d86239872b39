//! Reductions over ordered numeric sequences.
//!
//! Every function here is total: degenerate input yields `None` or NaN
//! instead of panicking, and callers decide whether to skip the statement.

/// Pearson product-moment correlation of two equal-length series.
///
/// Returns NaN when the lengths differ, when fewer than two points are
/// given, or when either series is constant (zero denominator).
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let denom = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (n * sum_xy - sum_x * sum_y) / denom
}

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Stable reduction: `replace(current, candidate)` decides whether the
/// candidate takes over, so with a strict comparison the first of equal
/// items wins.
pub fn extremum<T, F>(items: &[T], mut replace: F) -> Option<&T>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut iter = items.iter();
    let mut best = iter.next()?;
    for item in iter {
        if replace(best, item) {
            best = item;
        }
    }
    Some(best)
}

pub fn max_by_value<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<&T> {
    extremum(items, |best, cand| value(cand) > value(best))
}

pub fn min_by_value<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<&T> {
    extremum(items, |best, cand| value(cand) < value(best))
}

/// Percentage change from `prev` to `curr`; `None` on a zero base.
pub fn growth_rate(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    Some((curr - prev) / prev * 100.0)
}

/// Growth rates between adjacent points, dropping steps with a zero base.
pub fn step_growth_rates(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .filter_map(|w| growth_rate(w[0], w[1]))
        .collect()
}

/// Compound average growth rate in percent over `steps` periods.
pub fn compound_growth_rate(first: f64, last: f64, steps: usize) -> Option<f64> {
    if steps == 0 || first <= 0.0 || last <= 0.0 {
        return None;
    }
    let rate = ((last / first).powf(1.0 / steps as f64) - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}

/// Round half away from zero to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
