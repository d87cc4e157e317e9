use crate::prelude::{Age, AgeBracket, IfrError};
use std::slice;

/// A set of non-overlapping age brackets, each holding a value.
///
/// The partition is validated once, on construction, and then indexed by age
/// so lookups are a single array access. Two flavours exist:
///
/// * [`BracketMap::disjoint`] only requires brackets not to overlap. This is
///   what IFR models need, since many published estimates skip young ages.
/// * [`BracketMap::covering`] also requires the brackets to tile `[0, maxage]`
///   without gaps. Population pyramids and prevalence tables must be covering
///   for per-age redistribution to be well defined.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketMap<T> {
    entries: Vec<(AgeBracket, T)>,
    index: Vec<Option<usize>>,
}

impl<T> BracketMap<T> {
    /// Build a map from brackets that must not overlap.
    pub fn disjoint<I>(entries: I) -> Result<Self, IfrError>
    where
        I: IntoIterator<Item = (AgeBracket, T)>,
    {
        let mut entries: Vec<(AgeBracket, T)> = entries.into_iter().collect();
        entries.sort_by_key(|(b, _)| *b);

        for pair in entries.windows(2) {
            let (a, b) = (pair[0].0, pair[1].0);
            if a.overlaps(&b) {
                return Err(IfrError::domain(format!(
                    "brackets {} and {} overlap",
                    a, b
                )));
            }
        }

        let size = entries.last().map(|(b, _)| b.hi() as usize + 1).unwrap_or(0);
        let mut index = vec![None; size];
        for (i, (b, _)) in entries.iter().enumerate() {
            for age in b.ages() {
                index[age as usize] = Some(i);
            }
        }
        return Ok(BracketMap { entries, index });
    }

    /// Build a map from brackets that must exactly tile `[0, maxage]`.
    pub fn covering<I>(entries: I, maxage: Age) -> Result<Self, IfrError>
    where
        I: IntoIterator<Item = (AgeBracket, T)>,
    {
        let map = Self::disjoint(entries)?;
        if map.entries.is_empty() {
            return Err(IfrError::domain("no brackets"));
        }
        if let Some(age) = map.first_gap(maxage) {
            return Err(IfrError::domain(format!("no bracket covers age {}", age)));
        }
        if map.index.len() > maxage as usize + 1 {
            return Err(IfrError::domain(format!(
                "bracket {} extends beyond maximum age {}",
                map.entries[map.entries.len() - 1].0,
                maxage
            )));
        }
        return Ok(map);
    }

    /// First age in `[0, maxage]` not covered by any bracket.
    pub fn first_gap(&self, maxage: Age) -> Option<Age> {
        (0..=maxage).find(|&age| self.entry_index(age).is_none())
    }

    /// True if brackets tile `[0, maxage]`.
    pub fn covers(&self, maxage: Age) -> bool {
        self.first_gap(maxage).is_none()
    }

    #[inline]
    fn entry_index(&self, age: Age) -> Option<usize> {
        self.index.get(age as usize).copied().flatten()
    }

    /// Value of the bracket containing age, if any.
    pub fn get(&self, age: Age) -> Option<&T> {
        self.entry(age).map(|(_, v)| v)
    }

    /// Bracket and value containing age, if any.
    pub fn entry(&self, age: Age) -> Option<&(AgeBracket, T)> {
        self.entry_index(age).map(|i| &self.entries[i])
    }

    /// Value stored for exactly this bracket.
    pub fn get_bracket(&self, bracket: &AgeBracket) -> Option<&T> {
        self.entry(bracket.lo())
            .filter(|(b, _)| b == bracket)
            .map(|(_, v)| v)
    }

    /// Iterate over (bracket, value) pairs in ascending age order.
    pub fn iter(&self) -> slice::Iter<'_, (AgeBracket, T)> {
        self.entries.iter()
    }

    pub fn brackets(&self) -> impl Iterator<Item = AgeBracket> + '_ {
        self.entries.iter().map(|(b, _)| *b)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a BracketMap<T> {
    type Item = &'a (AgeBracket, T);
    type IntoIter = slice::Iter<'a, (AgeBracket, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::br;

    #[test]
    fn disjoint_lookup() {
        let map = BracketMap::disjoint(vec![(br(20, 39), 'b'), (br(5, 9), 'a')]).unwrap();
        assert_eq!(map.get(4), None);
        assert_eq!(map.get(5), Some(&'a'));
        assert_eq!(map.get(15), None);
        assert_eq!(map.get(39), Some(&'b'));
        assert_eq!(map.get(200), None);
        assert_eq!(map.brackets().collect::<Vec<_>>(), vec![br(5, 9), br(20, 39)]);
        assert_eq!(map.get_bracket(&br(20, 39)), Some(&'b'));
        assert_eq!(map.get_bracket(&br(20, 30)), None);
        assert!(!map.covers(39));
    }

    #[test]
    fn overlapping_brackets_are_rejected() {
        let res = BracketMap::disjoint(vec![(br(0, 10), 1), (br(10, 20), 2)]);
        assert_eq!(
            res,
            Err(IfrError::Domain("brackets 0-10 and 10-20 overlap".into()))
        );
    }

    #[test]
    fn covering_requires_no_gaps() {
        let ok = BracketMap::covering(vec![(br(0, 49), 1), (br(50, 99), 2)], 99);
        assert!(ok.is_ok());

        let gap = BracketMap::covering(vec![(br(0, 49), 1), (br(51, 99), 2)], 99);
        assert_eq!(gap, Err(IfrError::Domain("no bracket covers age 50".into())));

        let short = BracketMap::covering(vec![(br(0, 49), 1)], 99);
        assert!(short.is_err());

        let long = BracketMap::covering(vec![(br(0, 49), 1), (br(50, 120), 2)], 99);
        assert!(long.is_err());

        let empty = BracketMap::<i32>::covering(vec![], 99);
        assert!(empty.is_err());
    }
}
