pub use crate::{
    aggregate::{CoveragePolicy, RateAggregator, RateTable},
    bracket::AgeBracket,
    combine::{FoldComparison, ModelCombiner},
    config::Config,
    error::{IfrError, InputError, RangeSide},
    model::IfrModel,
    partition::BracketMap,
    pyramid::{ExpandedPyramid, Pyramid},
    reconstruct::{ExpCurve, ModelReconstructor},
    survey::{Redistribution, SurveyIfrDeriver, SurveyInputs, SurveyReport},
    Age, Real, MAXAGE,
};
