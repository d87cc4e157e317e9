use crate::{Real, INF};
use getset::CopyGetters;

/// Accumulates positive observations in log space.
///
/// Rates spanning several orders of magnitude are better summarized by
/// their geometric mean, `exp(mean(ln x))`, than by the arithmetic one.
#[derive(Debug, Copy, Clone, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LogStatsAcc {
    size: usize,
    log_total: Real,
    min: Real,
    max: Real,
}

impl LogStatsAcc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add observation. Non-positive values have no logarithm and are
    /// rejected, returning false.
    pub fn add(&mut self, x: Real) -> bool {
        if !(x > 0.0 && x.is_finite()) {
            return false;
        }
        self.size += 1;
        self.log_total += x.ln();
        self.min = Real::min(x, self.min);
        self.max = Real::max(x, self.max);
        return true;
    }

    /// Add many observations and return how many were accepted.
    pub fn add_many<I>(&mut self, xs: I) -> usize
    where
        I: IntoIterator<Item = Real>,
    {
        xs.into_iter().filter(|&x| self.add(x)).count()
    }

    /// Geometric mean of observations, or None if empty.
    pub fn geometric_mean(&self) -> Option<Real> {
        if self.size == 0 {
            return None;
        }
        return Some((self.log_total / self.size as Real).exp());
    }
}

impl Default for LogStatsAcc {
    fn default() -> Self {
        LogStatsAcc {
            size: 0,
            log_total: 0.0,
            min: INF,
            max: -INF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn simple_stats() {
        let mut acc = LogStatsAcc::new();
        assert_eq!(acc.geometric_mean(), None);
        acc.add(1.0);
        assert_eq!(acc.add_many(vec![10.0, 100.0, 0.0, -1.0]), 2);
        assert_eq!(acc.size(), 3);
        assert_approx_eq!(acc.geometric_mean().unwrap(), 10.0, 1e-12);
        assert_eq!(acc.min(), 1.0);
        assert_eq!(acc.max(), 100.0);
    }
}
