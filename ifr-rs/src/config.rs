use crate::{
    aggregate::DEFAULT_TOLERANCE,
    bracket::br,
    data,
    literature::FLU_SYMPTOMATIC_FRACTION,
    prelude::{
        Age, AgeBracket, CoveragePolicy, IfrError, IfrModel, InputError, RateAggregator, Real,
        Redistribution, SurveyIfrDeriver, SurveyInputs, MAXAGE,
    },
};
use getset::{CopyGetters, Getters};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr};

/// Default configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "ifr.toml";

/// A value attached to an age bracket, as written in configuration files:
/// `{ ages = [0, 9], value = 3.0 }`.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq)]
pub struct BracketValue {
    pub ages: AgeBracket,
    pub value: Real,
}

/// Survey tables given in a configuration file, overriding the built-in
/// ENE-COVID data.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SurveyConfig {
    pub name: String,
    pub maxage: Age,
    pub prevalence: Vec<BracketValue>,
    pub deaths: Vec<BracketValue>,
    pub unknown_age_bracket: Option<AgeBracket>,
    pub total_deaths: Real,
    /// Surveyed population by single year of age.
    pub pyramid: Vec<Real>,
    /// Population the derived model is projected on, by single year of age.
    pub target: Option<Vec<Real>>,
}

impl SurveyConfig {
    /// The Spanish ENE-COVID serosurvey, projected on the USA.
    pub fn ene_covid() -> Self {
        let table = |rows: &[(Age, Age, Real)]| -> Vec<BracketValue> {
            rows.iter()
                .map(|&(lo, hi, value)| BracketValue {
                    ages: br(lo, hi),
                    value,
                })
                .collect()
        };
        let all_ages = br(0, data::SURVEY_MAXAGE);
        let known: Real = data::SPAIN_DEATHS_BY_AGE.iter().map(|x| x.2).sum();
        let mut deaths = table(&data::SPAIN_DEATHS_BY_AGE);
        deaths.push(BracketValue {
            ages: all_ages,
            value: known,
        });

        SurveyConfig {
            name: "ENE-COVID".into(),
            maxage: data::SURVEY_MAXAGE,
            prevalence: table(&data::ENE_COVID_PREVALENCE),
            deaths,
            unknown_age_bracket: Some(all_ages),
            total_deaths: data::SPAIN_TOTAL_DEATHS,
            pyramid: data::PYRAMID_SPAIN.to_vec(),
            target: Some(data::PYRAMID_USA.to_vec()),
        }
    }

    /// Validate tables into survey inputs.
    pub fn inputs(&self) -> Result<SurveyInputs, IfrError> {
        SurveyInputs::new(
            self.prevalence.iter().map(|x| (x.ages, x.value)),
            self.maxage,
            self.deaths.iter().map(|x| (x.ages, x.value)),
            self.unknown_age_bracket,
            self.total_deaths,
        )
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Getters, CopyGetters)]
#[serde(default)]
pub struct Config {
    #[getset(get_copy = "pub")]
    maxage: Age,
    #[getset(get_copy = "pub")]
    coverage: CoveragePolicy,
    #[getset(get_copy = "pub")]
    tolerance: Real,
    #[getset(get_copy = "pub")]
    redistribution: Redistribution,
    #[getset(get_copy = "pub")]
    flu_symptomatic_fraction: Real,
    #[getset(get = "pub")]
    pyramid_file: String,
    #[getset(get_copy = "pub")]
    reference_year: u32,
    #[getset(get = "pub")]
    comparison_ages: Vec<Real>,
    #[getset(get_copy = "pub")]
    sort_by_model: usize,
    #[getset(get = "pub")]
    log_level: String,
    #[getset(get = "pub")]
    models: Vec<IfrModel>,
    #[getset(get = "pub")]
    survey: Option<SurveyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maxage: MAXAGE,
            coverage: CoveragePolicy::Strict,
            tolerance: DEFAULT_TOLERANCE,
            redistribution: Redistribution::Proportional,
            flu_symptomatic_fraction: FLU_SYMPTOMATIC_FRACTION,
            pyramid_file: "WPP2019_POP_F07_1_POPULATION_BY_AGE_BOTH_SEXES.csv".into(),
            reference_year: 2020,
            comparison_ages: (3..9).map(|d| 10.0 * d as Real).collect(),
            sort_by_model: 0,
            log_level: "warn".into(),
            models: vec![],
            survey: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML source.
    pub fn from_toml(src: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(src)?)
    }

    /// Read configuration from file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let src = fs::read_to_string(path)?;
        return Self::from_toml(&src);
    }

    /// Load configuration from an explicit path, or from [`CONFIG_FILE`] if
    /// it exists, or fall back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self, InputError> {
        match path {
            Some(p) => Self::from_path(p),
            None if Path::new(CONFIG_FILE).exists() => Self::from_path(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Aggregator configured with the coverage policy and tolerance.
    pub fn aggregator(&self) -> RateAggregator {
        RateAggregator::new(self.coverage, self.tolerance)
    }

    /// Survey deriver configured with the redistribution mode.
    pub fn deriver(&self) -> SurveyIfrDeriver {
        SurveyIfrDeriver::new(self.redistribution)
    }

    /// Log level filter. Unknown names fall back to "warn".
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Warn)
    }

    /// Initialize the global logger at the configured level.
    pub fn init_logger(&self) {
        use simple_logger::SimpleLogger;
        if let Err(e) = SimpleLogger::new().with_level(self.level_filter()).init() {
            eprintln!("logger already initialized: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_survey() {
        let survey = SurveyConfig::ene_covid();
        let inputs = survey.inputs().unwrap();
        assert_eq!(inputs.known_total(), 18722.0);
        assert_eq!(inputs.deaths().len(), 10);
        assert_eq!(survey.target.as_ref().map(|t| t.len()), Some(101));
    }

    #[test]
    fn default_config() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.maxage(), 100);
        assert_eq!(cfg.comparison_ages(), &vec![30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
        assert_eq!(cfg.aggregator(), RateAggregator::default());
        assert_eq!(cfg.level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn full_config() {
        let src = r#"
            coverage = "covered-only"
            redistribution = "uniform"
            tolerance = 1e-3
            reference_year = 2015
            log_level = "debug"

            [[models]]
            name = "Picon"
            rates = [
                { ages = [20, 39], rate = 0.08 },
                { ages = [40, 59], rate = 0.24 },
                { ages = [60, 100], rate = 4.63 },
            ]

            [survey]
            name = "tiny"
            maxage = 9
            prevalence = [{ ages = [0, 9], value = 10.0 }]
            deaths = [{ ages = [0, 4], value = 1.0 }, { ages = [5, 9], value = 3.0 }]
            total_deaths = 8.0
            pyramid = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0]
        "#;
        let cfg = Config::from_toml(src).unwrap();
        assert_eq!(cfg.coverage(), CoveragePolicy::CoveredOnly);
        assert_eq!(cfg.deriver().redistribution(), Redistribution::Uniform);
        assert_eq!(cfg.reference_year(), 2015);
        assert_eq!(cfg.level_filter(), LevelFilter::Debug);
        assert_eq!(cfg.models()[0].rate(45), Some(0.24));

        let survey = cfg.survey().as_ref().unwrap();
        assert_eq!(
            survey.deaths[1],
            BracketValue {
                ages: br(5, 9),
                value: 3.0
            }
        );
        assert_eq!(survey.unknown_age_bracket, None);
        assert_eq!(survey.target, None);
    }

    #[test]
    fn bad_config() {
        assert!(Config::from_toml("coverage = \"sometimes\"").is_err());
        assert!(Config::from_toml("maxage = 300").is_err());
    }
}
