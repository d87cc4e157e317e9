use std::iter;

use crate::{Real, INF};

/// ASCII plot of labeled positive values horizontally, in log scale.
///
/// Each value is a row of '='s whose length is proportional to its decade
/// above the smallest value, so rates spanning several orders of magnitude
/// stay readable. Non-positive values render as an empty bar.
pub fn render_log_hbars(values: &[(String, Real)], width: usize) -> String {
    let mut out = String::new();
    let logs: Vec<Option<Real>> = values
        .iter()
        .map(|(_, x)| if *x > 0.0 { Some(x.log10()) } else { None })
        .collect();
    let lo = logs.iter().flatten().cloned().fold(INF, |x, y| x.min(y));
    let hi = logs.iter().flatten().cloned().fold(-INF, |x, y| x.max(y));
    if !lo.is_finite() {
        return out;
    }
    let step = if hi > lo { (hi - lo) / width as Real } else { 1.0 };
    let pad = values.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0);

    for ((label, x), log) in values.iter().zip(logs) {
        let n = log.map(|v| 1 + ((v - lo) / step).round() as usize).unwrap_or(0);
        out.push_str(&format!("{:>pad$} |", label, pad = pad));
        out.extend(iter::repeat('=').take(n));
        out.push_str(&format!(" {:.4}\n", x));
    }
    return out;
}
