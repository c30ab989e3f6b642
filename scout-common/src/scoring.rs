//! Combine metric scoring
//!
//! Pure calculators comparing recorded combine values against division
//! benchmarks and across testing sessions. No I/O, deterministic for
//! identical inputs.

/// Progress score of a measured value against a benchmark, 0-100.
///
/// Timed drills pass `lower_is_better = true`: the score is 100 at or under
/// the benchmark and falls linearly to 0 at 1.5x the benchmark. Jumps, reps,
/// and max lifts use the inverse ramp: 100 at or over the benchmark, 0 at or
/// under half of it.
///
/// A missing measurement scores 0 rather than erroring.
pub fn benchmark_score(current: Option<f64>, benchmark: f64, lower_is_better: bool) -> u8 {
    let Some(current) = current else {
        return 0;
    };

    let raw = if lower_is_better {
        100.0 - ((current - benchmark) / (benchmark * 0.5)) * 100.0
    } else {
        ((current - benchmark * 0.5) / (benchmark * 0.5)) * 100.0
    };

    raw.round().clamp(0.0, 100.0) as u8
}

/// Signed percent change between the first and latest recorded value of a
/// metric.
///
/// For timed drills (`lower_is_better = true`) the sign is inverted so a
/// faster time reads as positive improvement. Returns `None` when either
/// value is missing or the baseline is zero; callers report that as
/// "no data", not as an error.
pub fn improvement(latest: Option<f64>, first: Option<f64>, lower_is_better: bool) -> Option<f64> {
    let latest = latest?;
    let first = first?;
    if first == 0.0 {
        return None;
    }

    let change = ((latest - first) / first) * 100.0;
    Some(if lower_is_better { -change } else { change })
}
