use crate::prelude::{Age, IfrError, Real};
use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive};

/// A closed interval of ages `[lo, hi]`.
///
/// A bracket whose upper bound equals the configured `maxage` is read as
/// "lo and older". Brackets order by their lower bound first, so sorting a
/// list of disjoint brackets sorts them by age.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, CopyGetters, Serialize, Deserialize,
)]
#[serde(try_from = "(Age, Age)", into = "(Age, Age)")]
#[getset(get_copy = "pub")]
pub struct AgeBracket {
    lo: Age,
    hi: Age,
}

impl AgeBracket {
    /// Create a new bracket. Fails if `hi < lo`.
    pub fn new(lo: Age, hi: Age) -> Result<Self, IfrError> {
        if hi < lo {
            return Err(IfrError::domain(format!("empty bracket {}-{}", lo, hi)));
        }
        return Ok(AgeBracket { lo, hi });
    }

    /// Bracket holding a single year of age.
    pub fn single(age: Age) -> Self {
        AgeBracket { lo: age, hi: age }
    }

    /// Number of single years of age in bracket.
    pub fn width(&self) -> usize {
        (self.hi - self.lo) as usize + 1
    }

    /// Mean of the bracket bounds. Used as the abscissa of the bracket when
    /// a model is seen as a curve.
    pub fn midpoint(&self) -> Real {
        (self.lo as Real + self.hi as Real) / 2.0
    }

    pub fn contains(&self, age: Age) -> bool {
        self.lo <= age && age <= self.hi
    }

    pub fn overlaps(&self, other: &AgeBracket) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    /// Iterate over every age in bracket, in ascending order.
    pub fn ages(&self) -> RangeInclusive<Age> {
        self.lo..=self.hi
    }

    /// Render as a column label: "{lo}-{hi}", or "{lo}+" for the open top
    /// bracket.
    pub fn label(&self, maxage: Age) -> String {
        if self.hi == maxage {
            return format!("{}+", self.lo);
        }
        return format!("{}-{}", self.lo, self.hi);
    }

    /// Parse a column label produced by [`AgeBracket::label`].
    pub fn parse_label(label: &str, maxage: Age) -> Result<Self, IfrError> {
        let err = || IfrError::InvalidLabel(label.to_string());
        let s = label.trim();
        if let Some(lo) = s.strip_suffix('+') {
            let lo: Age = lo.trim().parse().map_err(|_| err())?;
            return AgeBracket::new(lo, maxage).map_err(|_| err());
        }
        let mut parts = s.splitn(2, '-');
        let lo: Age = parts
            .next()
            .and_then(|x| x.trim().parse().ok())
            .ok_or_else(err)?;
        let hi: Age = parts
            .next()
            .and_then(|x| x.trim().parse().ok())
            .ok_or_else(err)?;
        return AgeBracket::new(lo, hi).map_err(|_| err());
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

impl std::convert::TryFrom<(Age, Age)> for AgeBracket {
    type Error = IfrError;

    fn try_from((lo, hi): (Age, Age)) -> Result<Self, Self::Error> {
        AgeBracket::new(lo, hi)
    }
}

impl From<AgeBracket> for (Age, Age) {
    fn from(b: AgeBracket) -> Self {
        (b.lo, b.hi)
    }
}

/// Shorthand for building brackets from literals known to be valid.
///
/// Panics if `hi < lo`, so it is only meant for constant tables and tests.
pub fn br(lo: Age, hi: Age) -> AgeBracket {
    assert!(lo <= hi, "invalid bracket {}-{}", lo, hi);
    AgeBracket { lo, hi }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAXAGE;

    #[test]
    fn bracket_geometry() {
        let b = br(20, 24);
        assert_eq!(b.width(), 5);
        assert_eq!(b.midpoint(), 22.0);
        assert!(b.contains(20) && b.contains(24) && !b.contains(25));
        assert_eq!(b.ages().collect::<Vec<_>>(), vec![20, 21, 22, 23, 24]);
        assert!(b.overlaps(&br(24, 30)));
        assert!(!b.overlaps(&br(25, 30)));
        assert!(AgeBracket::new(5, 4).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(br(0, 4).label(MAXAGE), "0-4");
        assert_eq!(br(100, MAXAGE).label(MAXAGE), "100+");
        assert_eq!(AgeBracket::parse_label("95-99", MAXAGE), Ok(br(95, 99)));
        assert_eq!(AgeBracket::parse_label(" 90+ ", MAXAGE), Ok(br(90, 100)));
        assert!(AgeBracket::parse_label("90", MAXAGE).is_err());
        assert!(AgeBracket::parse_label("9-x", MAXAGE).is_err());
        assert!(AgeBracket::parse_label("110+", MAXAGE).is_err());
    }

    #[test]
    fn brackets_sort_by_age() {
        let mut v = vec![br(10, 19), br(0, 9), br(20, 100)];
        v.sort();
        assert_eq!(v, vec![br(0, 9), br(10, 19), br(20, 100)]);
    }
}
