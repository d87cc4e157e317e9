use crate::{
    prelude::{IfrError, IfrModel, ModelReconstructor, Real},
    utils::LogStatsAcc,
};
use getset::CopyGetters;
use log::*;
use serde::Serialize;

/// Merges several independent models into a consensus estimate.
///
/// At each age, every model is reconstructed and the defined estimates are
/// combined by geometric mean. Models without an estimate at that age (out
/// of range, or next to a zero rate) are skipped with a warning.
#[derive(Debug, Clone)]
pub struct ModelCombiner<'a> {
    models: Vec<ModelReconstructor<'a>>,
}

impl<'a> ModelCombiner<'a> {
    pub fn new<I>(models: I) -> Self
    where
        I: IntoIterator<Item = &'a IfrModel>,
    {
        ModelCombiner {
            models: models.into_iter().map(ModelReconstructor::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Every defined estimate at age, as (model name, rate) pairs.
    pub fn estimates(&self, age: Real) -> Vec<(&'a str, Real)> {
        self.models
            .iter()
            .filter_map(|r| r.estimate(age).map(|v| (r.model().name().as_str(), v)))
            .collect()
    }

    /// Geometric mean of the defined estimates at age.
    ///
    /// Fails with [`IfrError::InsufficientData`] if no model has an estimate
    /// there. A model whose sample at exactly this age is zero is skipped as
    /// well, since zero has no place in a geometric mean.
    pub fn mean_rate(&self, age: Real) -> Result<Real, IfrError> {
        let mut acc = LogStatsAcc::new();
        for (name, rate) in self.estimates(age) {
            if !acc.add(rate) {
                warn!("{}: ignoring IFR zero for age {}", name, age);
            }
        }
        debug!("age {}: combined {} of {} models", age, acc.size(), self.len());
        return acc
            .geometric_mean()
            .ok_or(IfrError::InsufficientData { age });
    }

    /// Consensus estimate at each of the given ages.
    pub fn curve<I>(&self, ages: I) -> Result<Vec<(Real, Real)>, IfrError>
    where
        I: IntoIterator<Item = Real>,
    {
        ages.into_iter()
            .map(|age| self.mean_rate(age).map(|v| (age, v)))
            .collect()
    }
}

/// Consensus estimate at age combining the given models.
pub fn mean_rate(age: Real, models: &[IfrModel]) -> Result<Real, IfrError> {
    ModelCombiner::new(models).mean_rate(age)
}

/// Ratio between two consensus curves at a given age.
#[derive(Debug, Copy, Clone, PartialEq, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct FoldComparison {
    age: Real,
    baseline: Real,
    other: Real,
}

impl FoldComparison {
    /// How many times larger `other` is than `baseline`.
    pub fn fold(&self) -> Real {
        self.other / self.baseline
    }

    /// Compare two model groups at each age. Both groups must have an
    /// estimate at every requested age.
    pub fn compute<I>(
        ages: I,
        baseline: &ModelCombiner<'_>,
        other: &ModelCombiner<'_>,
    ) -> Result<Vec<FoldComparison>, IfrError>
    where
        I: IntoIterator<Item = Real>,
    {
        let mut out = vec![];
        for age in ages {
            out.push(FoldComparison {
                age,
                baseline: baseline.mean_rate(age)?,
                other: other.mean_rate(age)?,
            });
        }
        return Ok(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bracket::br, literature, reconstruct::rate_at};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn single_model_is_identity() {
        let models = literature::covid_models();
        for m in &models {
            let comb = ModelCombiner::new(std::iter::once(m));
            for &age in &[12.0, 33.3, 50.0, 67.0, 84.5] {
                match rate_at(age, m) {
                    Ok(v) if v > 0.0 => assert_approx_eq!(comb.mean_rate(age).unwrap(), v, 1e-12),
                    _ => assert!(comb.mean_rate(age).is_err()),
                }
            }
        }
    }

    #[test]
    fn geometric_mean_of_models() {
        let a = IfrModel::new("a", vec![(br(0, 50), 1.0), (br(51, 99), 1.0)]).unwrap();
        let b = IfrModel::new("b", vec![(br(0, 50), 4.0), (br(51, 99), 4.0)]).unwrap();
        let c = IfrModel::new("c", vec![(br(50, 59), 10.0), (br(60, 99), 100.0)]).unwrap();
        let models = vec![a, b, c];
        // c starts at 54.5.
        assert_approx_eq!(mean_rate(40.0, &models).unwrap(), 2.0, 1e-12);
        assert_approx_eq!(mean_rate(54.5, &models).unwrap(), 40.0_f64.powf(1.0 / 3.0), 1e-9);
        // a and b stop at 75.
        assert_approx_eq!(mean_rate(79.5, &models).unwrap(), 100.0, 1e-9);
    }

    #[test]
    fn no_estimate_is_an_error() {
        let models = vec![literature::picon()];
        assert_eq!(
            mean_rate(5.0, &models),
            Err(IfrError::InsufficientData { age: 5.0 })
        );
        assert_eq!(mean_rate(5.0, &[]), Err(IfrError::InsufficientData { age: 5.0 }));
    }

    #[test]
    fn zero_samples_are_skipped() {
        let zero = IfrModel::new("zero", vec![(br(0, 19), 0.0), (br(20, 99), 1.0)]).unwrap();
        let one = IfrModel::new("one", vec![(br(0, 19), 2.0), (br(20, 99), 2.0)]).unwrap();
        let models = vec![zero, one];
        assert_approx_eq!(mean_rate(9.5, &models).unwrap(), 2.0, 1e-12);
        assert_approx_eq!(mean_rate(30.0, &models).unwrap(), 2.0, 1e-12);
    }

    #[test]
    fn covid_is_deadlier_than_flu() {
        let covid = literature::covid_models();
        let flu = literature::flu_models(literature::FLU_SYMPTOMATIC_FRACTION);
        let ages = (3..9).map(|d| 10.0 * d as Real);
        let folds = FoldComparison::compute(
            ages,
            &ModelCombiner::new(&flu),
            &ModelCombiner::new(&covid),
        )
        .unwrap();
        assert_eq!(folds.len(), 6);
        assert_eq!(folds[0].age(), 30.0);
        for f in folds {
            assert!(f.fold() > 1.0, "fold {} at age {}", f.fold(), f.age());
        }
    }

    #[test]
    fn consensus_curve() {
        let covid = literature::covid_models();
        let comb = ModelCombiner::new(&covid);
        let curve = comb.curve(vec![30.0, 50.0, 70.0]).unwrap();
        assert_eq!(curve.len(), 3);
        assert!(curve[0].1 < curve[1].1 && curve[1].1 < curve[2].1);
    }
}
