//! Derive an age-stratified IFR model from a serosurvey.
//!
//! The survey gives the fraction of each age bracket carrying antibodies and
//! the number of deaths per age bracket. Combined with the population
//! pyramid this yields the number of infected people per bracket, hence an
//! IFR per bracket.
//!
//! The result is a lower bound: deaths lag infections (right-censoring) and
//! some deaths are never attributed to the disease.
use crate::{
    aggregate::accumulate,
    prelude::{Age, AgeBracket, BracketMap, IfrError, IfrModel, Pyramid, RateAggregator, Real},
};
use getset::{CopyGetters, Getters};
use log::*;
use serde::{Deserialize, Serialize};

/// Caveat carried with every derived estimate.
pub const CENSORING_CAVEAT: &str =
    "True IFR may be higher due to right-censoring and under-reporting of deaths";

/// How deaths of unknown age are spread among the known age brackets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Redistribution {
    /// Scale every bracket by `reported_total / known_total`, assuming deaths
    /// of unknown age follow the same age distribution as the known ones.
    Proportional,
    /// Give every bracket an equal share of the deaths of unknown age.
    Uniform,
}

impl Default for Redistribution {
    fn default() -> Self {
        Redistribution::Proportional
    }
}

/// Raw survey tables.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct SurveyInputs {
    #[getset(get = "pub")]
    prevalence: BracketMap<Real>,
    #[getset(get = "pub")]
    deaths: BracketMap<Real>,
    #[getset(get_copy = "pub")]
    unknown_age_bracket: Option<AgeBracket>,
    #[getset(get_copy = "pub")]
    reported_total_deaths: Real,
}

impl SurveyInputs {
    /// Validate survey tables.
    ///
    /// `prevalence` holds the percentage of each bracket that was infected
    /// and must tile `[0, maxage]`. `deaths` holds death counts by bracket;
    /// an entry for `unknown_age_bracket`, if any, stands for the all-ages
    /// aggregate and is left out of the known-age brackets.
    pub fn new<P, D>(
        prevalence: P,
        maxage: Age,
        deaths: D,
        unknown_age_bracket: Option<AgeBracket>,
        reported_total_deaths: Real,
    ) -> Result<Self, IfrError>
    where
        P: IntoIterator<Item = (AgeBracket, Real)>,
        D: IntoIterator<Item = (AgeBracket, Real)>,
    {
        let prevalence = BracketMap::covering(prevalence, maxage)?;
        for &(bracket, p) in prevalence.iter() {
            if !(0.0..=100.0).contains(&p) {
                return Err(IfrError::InvalidRate { bracket, rate: p });
            }
        }

        let deaths = BracketMap::disjoint(
            deaths
                .into_iter()
                .filter(|(b, _)| Some(*b) != unknown_age_bracket),
        )?;
        for &(b, n) in deaths.iter() {
            if !(n >= 0.0 && n.is_finite()) {
                return Err(IfrError::domain(format!(
                    "invalid death count {} in bracket {}",
                    n, b
                )));
            }
        }

        let known: Real = deaths.values().sum();
        if known <= 0.0 {
            return Err(IfrError::domain("no deaths with known age"));
        }
        if reported_total_deaths < known {
            return Err(IfrError::domain(format!(
                "reported total deaths {} lower than deaths with known age {}",
                reported_total_deaths, known
            )));
        }
        return Ok(SurveyInputs {
            prevalence,
            deaths,
            unknown_age_bracket,
            reported_total_deaths,
        });
    }

    /// Deaths with known age.
    pub fn known_total(&self) -> Real {
        self.deaths.values().sum()
    }

    /// Death counts per bracket after spreading the deaths of unknown age.
    pub fn redistributed_deaths(&self, mode: Redistribution) -> Vec<(AgeBracket, Real)> {
        let known = self.known_total();
        let unknown = self.reported_total_deaths - known;
        let share = unknown / self.deaths.len() as Real;
        let factor = self.reported_total_deaths / known;
        self.deaths
            .iter()
            .map(|&(b, n)| match mode {
                Redistribution::Proportional => (b, n * factor),
                Redistribution::Uniform => (b, n + share),
            })
            .collect()
    }
}

/// One line of the derivation report.
#[derive(Debug, Copy, Clone, PartialEq, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct SurveyRow {
    bracket: AgeBracket,
    infected: Real,
    deaths: Real,
    ifr: Real,
}

/// Result of a derivation: the model, the intermediate counts and the
/// overall IFR of the surveyed population.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct SurveyReport {
    #[getset(get = "pub")]
    model: IfrModel,
    #[getset(get = "pub")]
    rows: Vec<SurveyRow>,
    /// Overall IFR of the surveyed population, weighting each age by its
    /// number of infected people.
    #[getset(get_copy = "pub")]
    true_ifr: Real,
}

impl SurveyReport {
    pub fn caveat(&self) -> &'static str {
        CENSORING_CAVEAT
    }

    /// Overall IFR of the derived model applied to another population,
    /// given by single year of age, assuming the same prevalence at every
    /// age. Model brackets past the end of `target` are truncated.
    pub fn project(&self, aggregator: &RateAggregator, target: &[Real]) -> Result<Real, IfrError> {
        let maxage = target.len().saturating_sub(1).min(Age::MAX as usize) as Age;
        let pyramid = Pyramid::from_single_years(target, maxage)?;
        return aggregator.overall_rate(&pyramid, &self.model);
    }

    /// Render rows as the classic plain-text report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for r in &self.rows {
            out.push_str(&format!(
                "Ages {:2} to {:3}: {:7} infected, {:5} deaths, {:6.3}% IFR\n",
                r.bracket.lo(),
                r.bracket.hi(),
                r.infected.round(),
                r.deaths.round(),
                r.ifr
            ));
        }
        out.push_str(CENSORING_CAVEAT);
        out.push('\n');
        return out;
    }
}

/// Derives IFR models from survey inputs.
#[derive(Debug, Copy, Clone, PartialEq, Default, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SurveyIfrDeriver {
    redistribution: Redistribution,
}

impl SurveyIfrDeriver {
    pub fn new(redistribution: Redistribution) -> Self {
        SurveyIfrDeriver { redistribution }
    }

    /// Derive a model named `name` from survey inputs and the surveyed
    /// population, given as counts per single year of age. Ages past the end
    /// of `pyramid` are ignored. Counts must be finite and non-negative.
    pub fn derive(
        &self,
        name: &str,
        inputs: &SurveyInputs,
        pyramid: &[Real],
    ) -> Result<SurveyReport, IfrError> {
        for (age, &n) in pyramid.iter().enumerate() {
            if !(n >= 0.0 && n.is_finite()) {
                return Err(IfrError::domain(format!(
                    "invalid population count {} at age {}",
                    n, age
                )));
            }
        }
        let infected_at = |age: Age| -> Result<Option<Real>, IfrError> {
            let n = match pyramid.get(age as usize) {
                Some(&n) => n,
                None => return Ok(None),
            };
            match inputs.prevalence.get(age) {
                Some(p) => Ok(Some(n * p / 100.0)),
                None => Err(IfrError::domain(format!(
                    "no prevalence bracket covers age {}",
                    age
                ))),
            }
        };
        let infected_in = |bracket: &AgeBracket| -> Result<Real, IfrError> {
            let mut total = 0.0;
            for age in bracket.ages() {
                total += infected_at(age)?.unwrap_or(0.0);
            }
            Ok(total)
        };

        let mut rows = vec![];
        for (bracket, deaths) in inputs.redistributed_deaths(self.redistribution) {
            let infected = infected_in(&bracket)?;
            if infected <= 0.0 {
                return Err(IfrError::domain(format!(
                    "no infected people in bracket {}",
                    bracket
                )));
            }
            let ifr = 100.0 * deaths / infected;
            debug!("{}: {} infected, {} deaths", bracket, infected, deaths);
            rows.push(SurveyRow {
                bracket,
                infected,
                deaths,
                ifr,
            });
        }
        let model = IfrModel::new(name, rows.iter().map(|r| (r.bracket, r.ifr)))?;

        // Weighted the same way as an overall rate, with infected people in
        // place of the population.
        let infected = (0..pyramid.len().min(Age::MAX as usize + 1))
            .map(|age| infected_at(age as Age).map(|n| n.unwrap_or(0.0)))
            .collect::<Result<Vec<Real>, _>>()?;
        let (total_infected, total_deaths) =
            accumulate(&model, |age| infected.get(age as usize).copied());
        let true_ifr = 100.0 * total_deaths / total_infected;

        if let Some(all) = inputs.unknown_age_bracket {
            let infected = infected_in(&all)?;
            if infected <= 0.0 {
                return Err(IfrError::domain(format!(
                    "no infected people in bracket {}",
                    all
                )));
            }
            let deaths = inputs.reported_total_deaths;
            rows.push(SurveyRow {
                bracket: all,
                infected,
                deaths,
                ifr: 100.0 * deaths / infected,
            });
        }
        info!("{}: true IFR {:.3}%", name, true_ifr);

        return Ok(SurveyReport {
            model,
            rows,
            true_ifr,
        });
    }
}
