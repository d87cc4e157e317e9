//! Reconstruct per-age IFR values from bracketed estimates.
//!
//! A model is seen as a sparse set of samples `(midpoint, rate)`. Between two
//! consecutive samples the rate is assumed to grow exponentially, i.e. it
//! follows `f(x) = a * b^x` through both samples. Ages before the first or
//! after the last sample have no estimate: we never extrapolate.
use crate::prelude::{IfrError, IfrModel, RangeSide, Real};
use getset::CopyGetters;
use log::*;

/// Exponential curve `f(x) = a * b^x` through two points.
///
/// The curve is stored anchored at its first point, `f(x) = y0 * b^(x - x0)`,
/// which is the same function but avoids computing `b^x` for large `x`.
#[derive(Debug, Copy, Clone, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ExpCurve {
    x0: Real,
    y0: Real,
    b: Real,
}

impl ExpCurve {
    /// Fit the unique curve through (x1, y1) and (x2, y2).
    ///
    /// Return None if the points share an abscissa or if any ordinate is not
    /// strictly positive, since no curve of this family passes through them.
    pub fn through((x1, y1): (Real, Real), (x2, y2): (Real, Real)) -> Option<Self> {
        if x1 == x2 || !(y1 > 0.0 && y2 > 0.0) {
            return None;
        }
        let b = (y2 / y1).powf(1.0 / (x2 - x1));
        return Some(ExpCurve { x0: x1, y0: y1, b });
    }

    /// Scale factor `a` in `a * b^x`.
    pub fn a(&self) -> Real {
        self.y0 / self.b.powf(self.x0)
    }

    pub fn eval(&self, x: Real) -> Real {
        self.y0 * self.b.powf(x - self.x0)
    }
}

/// Evaluates a model at arbitrary ages.
///
/// Samples are extracted once from the model, so a reconstructor should be
/// reused when the same model is queried at many ages.
#[derive(Debug, Clone)]
pub struct ModelReconstructor<'a> {
    model: &'a IfrModel,
    samples: Vec<(Real, Real)>,
}

impl<'a> ModelReconstructor<'a> {
    pub fn new(model: &'a IfrModel) -> Self {
        ModelReconstructor {
            model,
            samples: model.samples(),
        }
    }

    pub fn model(&self) -> &'a IfrModel {
        self.model
    }

    /// Estimated IFR (%) at the given age.
    ///
    /// Ages that hit a sample midpoint exactly return the sample value. Other
    /// ages interpolate exponentially between the two neighbouring samples.
    /// Fails with [`IfrError::OutOfRange`] outside the sampled range and with
    /// [`IfrError::UndefinedInterpolation`] if a neighbouring sample is zero.
    pub fn rate_at(&self, age: Real) -> Result<Real, IfrError> {
        let samples = &self.samples;
        let idx = samples.partition_point(|&(m, _)| m < age);

        if let Some(&(m, rate)) = samples.get(idx) {
            if m == age {
                return Ok(rate);
            }
        }
        if idx == 0 {
            return Err(self.out_of_range(age, RangeSide::TooYoung));
        }
        if idx == samples.len() {
            return Err(self.out_of_range(age, RangeSide::TooOld));
        }

        let (lower, upper) = (samples[idx - 1], samples[idx]);
        match ExpCurve::through(lower, upper) {
            Some(curve) => Ok(curve.eval(age)),
            None => Err(IfrError::UndefinedInterpolation {
                model: self.model.name().clone(),
                age,
            }),
        }
    }

    /// Like [`ModelReconstructor::rate_at`], but report recoverable failures
    /// as a warning and return None.
    ///
    /// Non-recoverable errors cannot happen here, since the model was
    /// validated on construction; they are logged as errors nonetheless.
    pub fn estimate(&self, age: Real) -> Option<Real> {
        match self.rate_at(age) {
            Ok(rate) => Some(rate),
            Err(e) if e.is_recoverable() => {
                warn!("{}", e);
                None
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    fn out_of_range(&self, age: Real, side: RangeSide) -> IfrError {
        IfrError::OutOfRange {
            model: self.model.name().clone(),
            age,
            side,
        }
    }
}

/// Estimated IFR of model at the given age. See [`ModelReconstructor`].
pub fn rate_at(age: Real, model: &IfrModel) -> Result<Real, IfrError> {
    ModelReconstructor::new(model).rate_at(age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bracket::br, literature};
    use assert_approx_eq::assert_approx_eq;

    fn model() -> IfrModel {
        IfrModel::new("test", vec![(br(0, 50), 1.0), (br(51, 99), 10.0)]).unwrap()
    }

    #[test]
    fn interpolates_exponentially() {
        let m = IfrModel::new("test", vec![(br(20, 30), 1.0), (br(70, 80), 10.0)]).unwrap();
        let r = ModelReconstructor::new(&m);
        assert_approx_eq!(r.rate_at(50.0).unwrap(), 10.0_f64.sqrt(), 1e-12);
        assert_approx_eq!(r.rate_at(50.0).unwrap(), 3.162, 1e-3);
    }

    #[test]
    fn exact_at_sample_midpoints() {
        for m in literature::covid_models() {
            let r = ModelReconstructor::new(&m);
            for (x, y) in m.points() {
                assert_eq!(r.rate_at(x), Ok(y), "{} at {}", m.name(), x);
            }
        }
    }

    #[test]
    fn grows_monotonically_between_samples() {
        let m = model();
        let r = ModelReconstructor::new(&m);
        let mut prev = r.rate_at(25.0).unwrap();
        let mut age = 25.5;
        while age <= 75.0 {
            let v = r.rate_at(age).unwrap();
            assert!(v > prev, "{} <= {} at age {}", v, prev, age);
            prev = v;
            age += 0.5;
        }
    }

    #[test]
    fn no_extrapolation() {
        let m = model();
        let r = ModelReconstructor::new(&m);
        assert_eq!(
            r.rate_at(10.0),
            Err(IfrError::OutOfRange {
                model: "test".into(),
                age: 10.0,
                side: RangeSide::TooYoung
            })
        );
        assert_eq!(
            r.rate_at(90.0),
            Err(IfrError::OutOfRange {
                model: "test".into(),
                age: 90.0,
                side: RangeSide::TooOld
            })
        );
        assert_eq!(r.estimate(90.0), None);
    }

    #[test]
    fn zero_rates_are_not_interpolated() {
        let m = literature::poletti();
        let r = ModelReconstructor::new(&m);
        // Samples at 9.5 (0.0), 34.5 (0.0) and 54.5 (0.46).
        for &age in &[20.0, 40.0, 50.0] {
            assert_eq!(
                r.rate_at(age),
                Err(IfrError::UndefinedInterpolation {
                    model: "Poletti".into(),
                    age
                })
            );
            assert_eq!(r.estimate(age), None);
        }
        assert!(r.rate_at(60.0).unwrap() > 0.46);
    }

    #[test]
    fn curve_parameters() {
        let c = ExpCurve::through((25.0, 1.0), (75.0, 10.0)).unwrap();
        assert_approx_eq!(c.a() * c.b().powf(25.0), 1.0, 1e-12);
        assert_approx_eq!(c.a() * c.b().powf(75.0), 10.0, 1e-9);
        assert!(ExpCurve::through((25.0, 0.0), (75.0, 10.0)).is_none());
        assert!(ExpCurve::through((25.0, 1.0), (25.0, 10.0)).is_none());
    }
}
