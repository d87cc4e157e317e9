use crate::prelude::{Age, ExpandedPyramid, IfrError, IfrModel, Pyramid, Real};
use getset::{CopyGetters, Getters, Setters};
use log::*;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// What the population accumulated over a model's brackets is checked
/// against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoveragePolicy {
    /// Accumulated population must equal the whole pyramid. A model that
    /// does not cover every age of the pyramid is rejected.
    Strict,
    /// Accumulated population must equal the part of the pyramid inside the
    /// model's brackets. Partial models yield the rate of the covered
    /// sub-population.
    CoveredOnly,
}

impl Default for CoveragePolicy {
    fn default() -> Self {
        CoveragePolicy::Strict
    }
}

/// Relative tolerance used when comparing population sums.
pub const DEFAULT_TOLERANCE: Real = 1e-6;

/// Computes population-weighted overall rates.
#[derive(Debug, Copy, Clone, PartialEq, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct RateAggregator {
    coverage: CoveragePolicy,
    tolerance: Real,
}

impl Default for RateAggregator {
    fn default() -> Self {
        RateAggregator::new(CoveragePolicy::Strict, DEFAULT_TOLERANCE)
    }
}

impl RateAggregator {
    pub fn new(coverage: CoveragePolicy, tolerance: Real) -> Self {
        RateAggregator {
            coverage,
            tolerance,
        }
    }

    /// Number of people of exact age in pyramid.
    pub fn people_of_age(pyramid: &Pyramid, age: Age) -> Option<Real> {
        pyramid.people_of_age(age)
    }

    /// Overall IFR (%) of a population, given an age-stratified model.
    ///
    /// Each age in the model's brackets contributes its share of the pyramid
    /// weighted by the bracket rate. Ages outside the pyramid are silently
    /// dropped. The accumulated population is then checked against the
    /// pyramid total according to the coverage policy.
    pub fn overall_rate(&self, pyramid: &Pyramid, model: &IfrModel) -> Result<Real, IfrError> {
        let expanded = pyramid.expand();
        let expected = match self.coverage {
            CoveragePolicy::Strict => expanded.declared_total(),
            CoveragePolicy::CoveredOnly => covered_total(&expanded, model),
        };
        return self.rate_with_total(&expanded, model, expected);
    }

    /// Same as [`RateAggregator::overall_rate`], for an already expanded
    /// pyramid. Useful when the same pyramid is matched against many models.
    /// Under the strict policy the reference is the total declared by the
    /// bracketed pyramid, not the sum of the expanded counts.
    pub fn overall_rate_expanded(
        &self,
        pyramid: &ExpandedPyramid,
        model: &IfrModel,
    ) -> Result<Real, IfrError> {
        let expected = match self.coverage {
            CoveragePolicy::Strict => pyramid.declared_total(),
            CoveragePolicy::CoveredOnly => covered_total(pyramid, model),
        };
        return self.rate_with_total(pyramid, model, expected);
    }

    fn rate_with_total(
        &self,
        pyramid: &ExpandedPyramid,
        model: &IfrModel,
        expected: Real,
    ) -> Result<Real, IfrError> {
        let (population, deaths) = accumulate(model, |age| pyramid.get(age));
        trace!(
            "{}: population={}, deaths={}, expected={}",
            model.name(),
            population,
            deaths,
            expected
        );

        if (population - expected).abs() > self.tolerance * expected.abs().max(1.0) {
            return Err(IfrError::Consistency {
                model: model.name().clone(),
                accumulated: population,
                expected,
            });
        }
        if population <= 0.0 {
            return Err(IfrError::domain(format!(
                "{}: no population inside model brackets",
                model.name()
            )));
        }
        return Ok(100.0 * deaths / population);
    }
}

/// Accumulate (weight, weight * rate / 100) over every age of the model's
/// brackets, in ascending age order. Ages with no weight are skipped.
pub(crate) fn accumulate<F>(model: &IfrModel, weight: F) -> (Real, Real)
where
    F: Fn(Age) -> Option<Real>,
{
    let mut total = 0.0;
    let mut deaths = 0.0;
    for &(bracket, rate) in model.rates().iter() {
        for age in bracket.ages() {
            if let Some(n) = weight(age) {
                total += n;
                deaths += n * rate / 100.0;
            }
        }
    }
    return (total, deaths);
}

fn covered_total(pyramid: &ExpandedPyramid, model: &IfrModel) -> Real {
    model.rates().brackets().map(|b| pyramid.total_in(&b)).sum()
}

/// Overall rates for many regions and models.
///
/// Rows are regions and columns are models, in the order they were given.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct RateTable {
    regions: Vec<String>,
    models: Vec<String>,
    values: Array2<Real>,
}

impl RateTable {
    /// Compute every (region, model) rate. Regions are processed in
    /// parallel; each worker only reads its pyramid and the shared models.
    ///
    /// Stops at the first failure, reporting the offending region.
    pub fn compute(
        aggregator: &RateAggregator,
        regions: &[(String, Pyramid)],
        models: &[IfrModel],
    ) -> Result<Self, IfrError> {
        let rows = regions
            .par_iter()
            .map(|(region, pyramid)| {
                let expanded = pyramid.expand();
                models
                    .iter()
                    .map(|m| aggregator.overall_rate_expanded(&expanded, m))
                    .collect::<Result<Vec<Real>, _>>()
                    .map_err(|e| {
                        error!("{}: {}", region, e);
                        e
                    })
            })
            .collect::<Result<Vec<Vec<Real>>, _>>()?;

        let mut values = Array2::zeros((regions.len(), models.len()));
        for (i, row) in rows.iter().enumerate() {
            values.row_mut(i).assign(&ArrayView1::from(row.as_slice()));
        }
        return Ok(RateTable {
            regions: regions.iter().map(|(r, _)| r.clone()).collect(),
            models: models.iter().map(|m| m.name().clone()).collect(),
            values,
        });
    }

    /// Rates of region i, one per model.
    pub fn row(&self, i: usize) -> ArrayView1<'_, Real> {
        self.values.row(i)
    }

    pub fn get(&self, region: &str, model: &str) -> Option<Real> {
        let i = self.regions.iter().position(|r| r == region)?;
        let j = self.models.iter().position(|m| m == model)?;
        return Some(self.values[[i, j]]);
    }

    /// Row indices sorted by decreasing rate of the given model column.
    pub fn order_by(&self, col: usize) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.regions.len()).collect();
        if col >= self.models.len() {
            return idx;
        }
        idx.sort_by(|&i, &j| {
            self.values[[j, col]]
                .partial_cmp(&self.values[[i, col]])
                .unwrap_or(Ordering::Equal)
        });
        return idx;
    }
}
