use crate::prelude::{Age, AgeBracket, BracketMap, IfrError, Real};
use getset::Getters;
use serde::{Deserialize, Serialize};

/// A named age-stratified IFR model.
///
/// Maps non-overlapping age brackets to an IFR in percent. Brackets need not
/// line up with any pyramid, and they need not cover every age: several
/// published estimates simply do not report young ages. A rate of zero is
/// valid, but cannot be used as an interpolation endpoint (see
/// [`crate::reconstruct`]).
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(try_from = "ModelTable", into = "ModelTable")]
pub struct IfrModel {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    rates: BracketMap<Real>,
}

impl IfrModel {
    /// Create model from (bracket, rate%) pairs.
    pub fn new<I>(name: impl Into<String>, rates: I) -> Result<Self, IfrError>
    where
        I: IntoIterator<Item = (AgeBracket, Real)>,
    {
        let rates = BracketMap::disjoint(rates)?;
        for &(bracket, rate) in rates.iter() {
            if !(rate >= 0.0 && rate.is_finite()) {
                return Err(IfrError::InvalidRate { bracket, rate });
            }
        }
        return Ok(IfrModel {
            name: name.into(),
            rates,
        });
    }

    /// Rate of the bracket containing age, if the model covers it.
    pub fn rate(&self, age: Age) -> Option<Real> {
        self.rates.get(age).copied()
    }

    /// Model as a curve: (bracket midpoint, rate) samples sorted by
    /// midpoint.
    ///
    /// Brackets are disjoint and sorted by lower bound, so midpoints come out
    /// strictly increasing.
    pub fn points(&self) -> impl Iterator<Item = (Real, Real)> + '_ {
        self.rates.iter().map(|(b, r)| (b.midpoint(), *r))
    }

    /// Collected version of [`IfrModel::points`].
    pub fn samples(&self) -> Vec<(Real, Real)> {
        self.points().collect()
    }

    /// True if the model has a rate for every age in `[0, maxage]`.
    pub fn covers(&self, maxage: Age) -> bool {
        self.rates.covers(maxage)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Serialized form of a model, used in configuration files:
///
/// ```toml
/// [[models]]
/// name = "US CDC"
/// rates = [
///     { ages = [0, 19], rate = 0.003 },
///     { ages = [20, 49], rate = 0.02 },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTable {
    pub name: String,
    pub rates: Vec<RateEntry>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub ages: AgeBracket,
    pub rate: Real,
}

impl std::convert::TryFrom<ModelTable> for IfrModel {
    type Error = IfrError;

    fn try_from(table: ModelTable) -> Result<Self, Self::Error> {
        IfrModel::new(table.name, table.rates.into_iter().map(|e| (e.ages, e.rate)))
    }
}

impl From<IfrModel> for ModelTable {
    fn from(model: IfrModel) -> Self {
        ModelTable {
            rates: model
                .rates
                .iter()
                .map(|&(ages, rate)| RateEntry { ages, rate })
                .collect(),
            name: model.name,
        }
    }
}

/// Build a model from literal (lo, hi, rate) triples.
///
/// Panics on malformed input, so it is reserved to constant tables.
pub(crate) fn literal(name: &str, rates: &[(Age, Age, Real)]) -> IfrModel {
    let pairs = rates
        .iter()
        .map(|&(lo, hi, r)| (crate::bracket::br(lo, hi), r));
    match IfrModel::new(name, pairs) {
        Ok(m) => m,
        Err(e) => panic!("invalid built-in model '{}': {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::br;

    #[test]
    fn model_samples_are_sorted_midpoints() {
        let m = IfrModel::new("test", vec![(br(50, 99), 5.0), (br(0, 49), 1.0)]).unwrap();
        assert_eq!(m.samples(), vec![(24.5, 1.0), (74.5, 5.0)]);
        assert_eq!(m.rate(60), Some(5.0));
        assert_eq!(m.rate(100), None);
        assert!(m.covers(99));
        assert!(!m.covers(100));
    }

    #[test]
    fn invalid_rates_are_rejected() {
        let res = IfrModel::new("bad", vec![(br(0, 9), -0.1)]);
        assert_eq!(
            res,
            Err(IfrError::InvalidRate {
                bracket: br(0, 9),
                rate: -0.1
            })
        );
        assert!(IfrModel::new("bad", vec![(br(0, 9), 1.0), (br(9, 19), 1.0)]).is_err());
        assert!(IfrModel::new("zero", vec![(br(0, 9), 0.0)]).is_ok());
    }

    #[test]
    fn models_read_from_toml() {
        #[derive(Deserialize)]
        struct File {
            models: Vec<IfrModel>,
        }
        let src = r#"
            [[models]]
            name = "US CDC"
            rates = [
                { ages = [0, 19], rate = 0.003 },
                { ages = [20, 49], rate = 0.02 },
                { ages = [50, 69], rate = 0.5 },
                { ages = [70, 100], rate = 5.4 },
            ]
        "#;
        let file: File = toml::from_str(src).unwrap();
        let m = &file.models[0];
        assert_eq!(m.name(), "US CDC");
        assert_eq!(m.rate(75), Some(5.4));
        assert!(m.covers(100));

        let bad = r#"
            [[models]]
            name = "overlap"
            rates = [{ ages = [0, 19], rate = 0.1 }, { ages = [10, 49], rate = 0.2 }]
        "#;
        assert!(toml::from_str::<File>(bad).is_err());
    }
}
