//! Estimate the overall Infection Fatality Ratio (IFR) of a population from
//! age-stratified IFR models and a population pyramid.
//!
//! The crate is organized around a small numerical engine:
//!
//! * [`pyramid`] redistributes bracketed population counts onto single years
//!   of age;
//! * [`aggregate`] integrates a model over a pyramid into an overall rate;
//! * [`reconstruct`] interpolates a model at arbitrary ages;
//! * [`combine`] merges several models into a consensus by geometric mean;
//! * [`survey`] derives a new model from seroprevalence and death counts.
//!
//! Everything else (ingestion, reports, configuration) is glue around it.
pub mod aggregate;
pub mod bracket;
pub mod combine;
pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod literature;
pub mod model;
pub mod partition;
pub mod prelude;
pub mod pyramid;
pub mod reconstruct;
pub mod report;
pub mod survey;
pub mod utils;

pub use crate::aggregate::{CoveragePolicy, RateAggregator, RateTable};
pub use crate::bracket::AgeBracket;
pub use crate::combine::ModelCombiner;
pub use crate::error::{IfrError, InputError};
pub use crate::model::IfrModel;
pub use crate::pyramid::{ExpandedPyramid, Pyramid};
pub use crate::reconstruct::ModelReconstructor;
pub use crate::survey::{Redistribution, SurveyIfrDeriver, SurveyInputs};

/// Base Real type used by this crate. Uses an alias to easily change precision
/// if necessary.
pub type Real = f64;
pub(crate) const INF: Real = Real::INFINITY;

/// A single year of age.
pub type Age = u8;

/// Default upper sentinel for open-ended brackets such as "100+".
pub const MAXAGE: Age = 100;
