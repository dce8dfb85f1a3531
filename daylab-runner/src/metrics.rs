//! Performance metrics — pure functions over a PnL series.
//!
//! Every metric is a pure function: series in, scalar out. All figures are
//! cash values, not percentages — a run has no initial capital base to
//! divide by.

use crate::pnl::PnlPoint;

/// Final cumulative PnL; 0.0 for an empty series.
pub fn total_pnl(series: &[PnlPoint]) -> f64 {
    series.last().map(|p| p.cumulative).unwrap_or(0.0)
}

/// Sample standard deviation of the daily PnL.
///
/// Returns 0.0 for fewer than two days.
pub fn daily_volatility(series: &[PnlPoint]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let daily: Vec<f64> = series.iter().map(|p| p.daily).collect();
    std_dev(&daily)
}

/// Maximum drawdown of the cumulative curve, as a non-positive cash value
/// (e.g. -120.0 means the curve fell 120 below its running peak).
pub fn max_drawdown(series: &[PnlPoint]) -> f64 {
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for point in series {
        if point.cumulative > peak {
            peak = point.cumulative;
        }
        let dd = point.cumulative - peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
