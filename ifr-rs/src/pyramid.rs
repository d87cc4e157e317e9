use crate::prelude::{Age, AgeBracket, BracketMap, IfrError, Real};
use getset::CopyGetters;
use ndarray::Array1;

/// Population counts grouped by age brackets.
///
/// Counts are the headcount of the whole bracket, not per year. Brackets
/// must tile `[0, maxage]`; this is checked on construction, so every age in
/// the domain maps to exactly one bracket.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
pub struct Pyramid {
    counts: BracketMap<Real>,
    #[getset(get_copy = "pub")]
    maxage: Age,
    #[getset(get_copy = "pub")]
    total: Real,
}

impl Pyramid {
    /// Create pyramid from (bracket, headcount) pairs.
    pub fn new<I>(counts: I, maxage: Age) -> Result<Self, IfrError>
    where
        I: IntoIterator<Item = (AgeBracket, Real)>,
    {
        let counts = BracketMap::covering(counts, maxage)?;
        for &(b, n) in counts.iter() {
            if !(n >= 0.0 && n.is_finite()) {
                return Err(IfrError::domain(format!(
                    "invalid population count {} in bracket {}",
                    n, b
                )));
            }
        }
        let total = counts.values().sum();
        return Ok(Pyramid {
            counts,
            maxage,
            total,
        });
    }

    /// Create pyramid from a list of counts indexed by single year of age.
    ///
    /// The last entry absorbs every age up to `maxage`, so a list with 91
    /// elements and `maxage = 100` yields a "90+" bracket.
    pub fn from_single_years(counts: &[Real], maxage: Age) -> Result<Self, IfrError> {
        if counts.is_empty() {
            return Err(IfrError::domain("empty pyramid"));
        }
        if counts.len() > maxage as usize + 1 {
            return Err(IfrError::domain(format!(
                "{} single-year counts exceed maximum age {}",
                counts.len(),
                maxage
            )));
        }
        let last = counts.len() - 1;
        let brackets = counts.iter().enumerate().map(|(i, &n)| {
            let hi = if i == last { maxage } else { i as Age };
            (AgeBracket::new(i as Age, hi), n)
        });
        let mut entries = Vec::with_capacity(counts.len());
        for (b, n) in brackets {
            entries.push((b?, n));
        }
        return Self::new(entries, maxage);
    }

    /// Estimated number of people of exact age `age`, assuming people are
    /// uniformly spread inside each bracket. None for ages beyond `maxage`.
    pub fn people_of_age(&self, age: Age) -> Option<Real> {
        self.counts
            .entry(age)
            .map(|(b, n)| n / b.width() as Real)
    }

    /// Headcount of a bracket, if it is one of the pyramid's brackets.
    pub fn count(&self, bracket: &AgeBracket) -> Option<Real> {
        self.counts.get_bracket(bracket).copied()
    }

    pub fn brackets(&self) -> impl Iterator<Item = AgeBracket> + '_ {
        self.counts.brackets()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AgeBracket, Real)> + '_ {
        self.counts.iter()
    }

    /// Redistribute each bracket uniformly onto single years of age.
    pub fn expand(&self) -> ExpandedPyramid {
        let data = (0..=self.maxage)
            .map(|age| self.people_of_age(age).unwrap_or(0.0))
            .collect::<Array1<Real>>();
        ExpandedPyramid {
            maxage: self.maxage,
            declared_total: self.total,
            data,
        }
    }
}

/// Population counts per single year of age, `0..=maxage`.
///
/// Derived from a [`Pyramid`] and never mutated. Counts are usually
/// fractional since bracket totals are split evenly among their years.
/// The bracketed total of the source pyramid is kept alongside, as the
/// reference for consistency checks.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
pub struct ExpandedPyramid {
    #[getset(get_copy = "pub")]
    maxage: Age,
    #[getset(get_copy = "pub")]
    declared_total: Real,
    data: Array1<Real>,
}

impl ExpandedPyramid {
    /// Number of people of the given age, or None outside the domain.
    pub fn get(&self, age: Age) -> Option<Real> {
        self.data.get(age as usize).copied()
    }

    pub fn total(&self) -> Real {
        self.data.sum()
    }

    /// Sum of counts for the ages in bracket that fall inside the domain.
    pub fn total_in(&self, bracket: &AgeBracket) -> Real {
        bracket.ages().filter_map(|age| self.get(age)).sum()
    }

    /// Iterate over (age, count) in ascending age order.
    pub fn iter(&self) -> impl Iterator<Item = (Age, Real)> + '_ {
        self.data.iter().enumerate().map(|(i, &n)| (i as Age, n))
    }

}

#[cfg(test)]
impl ExpandedPyramid {
    pub(crate) fn with_declared_total(mut self, total: Real) -> Self {
        self.declared_total = total;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::br;
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn random_pyramid(rng: &mut SmallRng, maxage: Age) -> Pyramid {
        let mut entries = vec![];
        let mut lo = 0;
        while lo <= maxage {
            let hi = (lo as u32 + rng.gen_range(0..12)).min(maxage as u32) as Age;
            entries.push((br(lo, hi), rng.gen_range(0.0..1e6)));
            if hi == maxage {
                break;
            }
            lo = hi + 1;
        }
        Pyramid::new(entries, maxage).unwrap()
    }

    #[test]
    fn expansion_is_uniform_within_brackets() {
        let pyr = Pyramid::new(vec![(br(0, 4), 500.0), (br(5, 100), 960.0)], 100).unwrap();
        let exp = pyr.expand();
        assert_eq!(exp.get(0), Some(100.0));
        assert_eq!(exp.get(4), Some(100.0));
        assert_eq!(exp.get(5), Some(10.0));
        assert_eq!(exp.get(100), Some(10.0));
        assert_eq!(exp.get(101), None);
        assert_eq!(pyr.people_of_age(101), None);
        assert_eq!(pyr.total(), 1460.0);
        assert_approx_eq!(exp.total_in(&br(0, 9)), 550.0);
    }

    #[test]
    fn expansion_preserves_total() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let pyr = random_pyramid(&mut rng, 100);
            let exp = pyr.expand();
            assert_approx_eq!(exp.total(), pyr.total(), 1e-6 * pyr.total().max(1.0));
        }
    }

    #[test]
    fn expansion_keeps_declared_total() {
        let pyr = Pyramid::new(vec![(br(0, 2), 1.0), (br(3, 9), 1e9)], 9).unwrap();
        let exp = pyr.expand();
        assert_eq!(exp.declared_total(), pyr.total());
        assert_eq!(exp.maxage(), 9);
    }

    #[test]
    fn malformed_pyramids_are_rejected() {
        assert!(Pyramid::new(vec![(br(0, 49), 1.0), (br(60, 100), 1.0)], 100).is_err());
        assert!(Pyramid::new(vec![(br(0, 50), 1.0), (br(50, 100), 1.0)], 100).is_err());
        assert!(Pyramid::new(vec![(br(0, 50), -1.0), (br(51, 100), 1.0)], 100).is_err());
        assert!(Pyramid::new(vec![(br(0, 50), Real::NAN), (br(51, 100), 1.0)], 100).is_err());
    }

    #[test]
    fn single_year_pyramids() {
        let pyr = Pyramid::from_single_years(&[10.0, 20.0, 30.0], 2).unwrap();
        assert_eq!(pyr.people_of_age(1), Some(20.0));
        assert_eq!(pyr.total(), 60.0);

        let open = Pyramid::from_single_years(&[10.0, 20.0, 90.0], 10).unwrap();
        assert_eq!(open.count(&br(2, 10)), Some(90.0));
        assert_eq!(open.people_of_age(10), Some(10.0));

        assert!(Pyramid::from_single_years(&[], 10).is_err());
        assert!(Pyramid::from_single_years(&[1.0; 12], 10).is_err());
    }
}
