use pyo3::{prelude::*, wrap_pyfunction};

extern crate pyo3;
use ifr::prelude as rs;
use ifr::prelude::{Age, Real};
use ifr::{config::SurveyConfig, literature};
use paste::paste;
use pyo3::exceptions::*;
use pyo3::types::PyDict;
use pythonize::{depythonize, pythonize};

macro_rules! py_mutable_props {
    ($name:ident { $($x:ident : $t:ident),* }) => {
        paste! {
            #[pymethods]
            impl $name {
                $(
                    #[getter]
                    pub fn [<get_ $x>](&self) -> PyResult<$t> {
                        Ok(self.data.$x())
                    }

                    #[setter]
                    pub fn [<set_ $x>](&mut self, value: $t) -> PyResult<()> {
                        self.data.[<set_ $x>](value);
                        Ok(())
                    }
                )*
            }
        }
    };
}

macro_rules! py_immutable_props {
    ($name:ident { $($x:ident : $t:ident),*}) => {
        paste! {
            #[pymethods]
            impl $name {
                $(
                    #[getter]
                    pub fn [<get_ $x>](&self) -> PyResult<$t> {
                        Ok(self.data.$x().into())
                    }
                )*
            }
        }
    };
}

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn brackets(rows: Vec<(Age, Age, Real)>) -> PyResult<Vec<(rs::AgeBracket, Real)>> {
    rows.into_iter()
        .map(|(lo, hi, x)| Ok((rs::AgeBracket::new(lo, hi).map_err(value_error)?, x)))
        .collect()
}

fn coverage_policy(name: &str) -> PyResult<rs::CoveragePolicy> {
    match name {
        "strict" => Ok(rs::CoveragePolicy::Strict),
        "covered-only" => Ok(rs::CoveragePolicy::CoveredOnly),
        _ => Err(PyValueError::new_err(format!("invalid coverage policy: {}", name))),
    }
}

/// An age-stratified IFR model.
#[pyclass]
#[derive(Debug, Clone)]
pub struct Model {
    data: rs::IfrModel,
}

impl Model {
    fn new_from_data(model: rs::IfrModel) -> Self {
        Model { data: model }
    }
}

#[pymethods]
impl Model {
    #[new]
    fn new(name: String, rates: Vec<(Age, Age, Real)>) -> PyResult<Self> {
        let data = rs::IfrModel::new(name, brackets(rates)?).map_err(value_error)?;
        Ok(Model { data })
    }

    /// Build model from a dict {"name": ..., "rates": [{"ages": [lo, hi], "rate": x}]}.
    #[staticmethod]
    fn from_dict(obj: &PyDict) -> PyResult<Self> {
        Ok(Model {
            data: depythonize(obj.as_ref())?,
        })
    }

    fn to_dict(&self) -> PyResult<PyObject> {
        let gil = Python::acquire_gil();
        Ok(pythonize(gil.python(), &self.data)?)
    }

    /// Rate of the bracket containing age, or None.
    fn rate(&self, age: Age) -> Option<Real> {
        self.data.rate(age)
    }

    /// Rate at an arbitrary age, interpolated between bracket midpoints.
    fn rate_at(&self, age: Real) -> PyResult<Real> {
        rs::ModelReconstructor::new(&self.data)
            .rate_at(age)
            .map_err(value_error)
    }

    fn samples(&self) -> Vec<(Real, Real)> {
        self.data.samples()
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!("{:?}", self.data))
    }
}

py_immutable_props!(Model { name: String });

/// Population counts grouped by age brackets.
#[pyclass]
#[derive(Debug, Clone)]
pub struct Pyramid {
    data: rs::Pyramid,
}

#[pymethods]
impl Pyramid {
    #[new]
    #[args(maxage = "100")]
    fn new(counts: Vec<(Age, Age, Real)>, maxage: Age) -> PyResult<Self> {
        let data = rs::Pyramid::new(brackets(counts)?, maxage).map_err(value_error)?;
        Ok(Pyramid { data })
    }

    #[staticmethod]
    #[args(maxage = "100")]
    fn from_single_years(counts: Vec<Real>, maxage: Age) -> PyResult<Self> {
        let data = rs::Pyramid::from_single_years(&counts, maxage).map_err(value_error)?;
        Ok(Pyramid { data })
    }

    fn people_of_age(&self, age: Age) -> Option<Real> {
        self.data.people_of_age(age)
    }

    /// Headcount for each single year of age.
    fn expand(&self) -> Vec<Real> {
        self.data.expand().iter().map(|(_, n)| n).collect()
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!("{:?}", self.data))
    }
}

py_immutable_props!(Pyramid {
    maxage: Age,
    total: Real
});

/// Computes overall rates of populations.
#[pyclass]
#[derive(Debug, Clone)]
pub struct Aggregator {
    data: rs::RateAggregator,
}

#[pymethods]
impl Aggregator {
    #[new]
    #[args(coverage = "\"strict\"", tolerance = "1e-6")]
    fn new(coverage: &str, tolerance: Real) -> PyResult<Self> {
        Ok(Aggregator {
            data: rs::RateAggregator::new(coverage_policy(coverage)?, tolerance),
        })
    }

    fn overall_rate(&self, pyramid: PyRef<Pyramid>, model: PyRef<Model>) -> PyResult<Real> {
        self.data
            .overall_rate(&pyramid.data, &model.data)
            .map_err(value_error)
    }
}

py_mutable_props!(Aggregator { tolerance: Real });

/// Overall IFR (%) of a population under the given model.
#[pyfunction(coverage = "\"strict\"")]
fn overall_ifr(pyramid: PyRef<Pyramid>, model: PyRef<Model>, coverage: &str) -> PyResult<Real> {
    let agg = rs::RateAggregator::new(coverage_policy(coverage)?, 1e-6);
    agg.overall_rate(&pyramid.data, &model.data)
        .map_err(value_error)
}

/// Geometric mean of the estimates of several models at age.
#[pyfunction]
fn mean_rate(age: Real, models: Vec<PyRef<Model>>) -> PyResult<Real> {
    let combiner = rs::ModelCombiner::new(models.iter().map(|m| &m.data));
    combiner.mean_rate(age).map_err(value_error)
}

/// Published COVID-19 models.
#[pyfunction]
fn covid_models() -> Vec<Model> {
    literature::covid_models()
        .into_iter()
        .map(Model::new_from_data)
        .collect()
}

/// Seasonal influenza models, scaled by the fraction of symptomatic cases.
#[pyfunction(symptomatic = "literature::FLU_SYMPTOMATIC_FRACTION")]
fn flu_models(symptomatic: Real) -> Vec<Model> {
    literature::flu_models(symptomatic)
        .into_iter()
        .map(Model::new_from_data)
        .collect()
}

/// Derive a model from a serosurvey. The survey is given as a dict with the
/// same fields as the `[survey]` table of the configuration file; the
/// ENE-COVID survey is used when omitted.
///
/// Returns a dict with the derived model, per-bracket rows, the true IFR and,
/// if the survey has a target population, the projected IFR.
#[pyfunction(survey = "None", redistribution = "\"proportional\"")]
fn derive_survey(survey: Option<&PyDict>, redistribution: &str) -> PyResult<PyObject> {
    let survey: SurveyConfig = match survey {
        Some(d) => depythonize(d.as_ref())?,
        None => SurveyConfig::ene_covid(),
    };
    let mode = match redistribution {
        "proportional" => rs::Redistribution::Proportional,
        "uniform" => rs::Redistribution::Uniform,
        _ => {
            return Err(PyValueError::new_err(format!(
                "invalid redistribution: {}",
                redistribution
            )))
        }
    };
    let inputs = survey.inputs().map_err(value_error)?;
    let report = rs::SurveyIfrDeriver::new(mode)
        .derive(&survey.name, &inputs, &survey.pyramid)
        .map_err(value_error)?;

    let gil = Python::acquire_gil();
    let py = gil.python();
    let dict = PyDict::new(py);
    dict.set_item("model", Model::new_from_data(report.model().clone()).into_py(py))?;
    dict.set_item("rows", pythonize(py, report.rows())?)?;
    dict.set_item("true_ifr", report.true_ifr())?;
    dict.set_item("caveat", report.caveat())?;
    if let Some(target) = &survey.target {
        let ifr = report
            .project(&rs::RateAggregator::default(), target)
            .map_err(value_error)?;
        dict.set_item("projected_ifr", ifr)?;
    }
    Ok(dict.to_object(py))
}

#[pymodule]
fn ifrrust(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<Model>()?;
    m.add_class::<Pyramid>()?;
    m.add_class::<Aggregator>()?;
    m.add_function(wrap_pyfunction!(overall_ifr, m)?)?;
    m.add_function(wrap_pyfunction!(mean_rate, m)?)?;
    m.add_function(wrap_pyfunction!(covid_models, m)?)?;
    m.add_function(wrap_pyfunction!(flu_models, m)?)?;
    m.add_function(wrap_pyfunction!(derive_survey, m)?)?;

    Ok(())
}
