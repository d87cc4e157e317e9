use crate::prelude::{AgeBracket, Real};
use std::fmt;
use thiserror::Error;

/// Which end of a model's domain was crossed by a query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RangeSide {
    TooYoung,
    TooOld,
}

impl fmt::Display for RangeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSide::TooYoung => write!(f, "too young"),
            RangeSide::TooOld => write!(f, "too old"),
        }
    }
}

/// Errors raised by the numerical engine.
///
/// Per-model lookups fail with recoverable errors (see
/// [`IfrError::is_recoverable`]); callers combining several models skip the
/// offending model and continue. Every other variant means the input itself
/// is corrupt and the computation must stop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IfrError {
    #[error("invalid input: {0}")]
    Domain(String),

    #[error(
        "{model}: accumulated population {accumulated} does not match pyramid total {expected}"
    )]
    Consistency {
        model: String,
        accumulated: Real,
        expected: Real,
    },

    #[error("{model}: no data, age {age} {side}")]
    OutOfRange {
        model: String,
        age: Real,
        side: RangeSide,
    },

    #[error("{model}: ignoring IFR zero for age {age}")]
    UndefinedInterpolation { model: String, age: Real },

    #[error("no estimate available at age {age}")]
    InsufficientData { age: Real },

    #[error("invalid age bracket label '{0}'")]
    InvalidLabel(String),

    #[error("invalid rate {rate} for bracket {bracket}")]
    InvalidRate { bracket: AgeBracket, rate: Real },
}

impl IfrError {
    /// True for errors that only mean "no estimate for this model here".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IfrError::OutOfRange { .. } | IfrError::UndefinedInterpolation { .. }
        )
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        IfrError::Domain(msg.into())
    }
}

/// Errors raised while reading tables or configuration files.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': cannot parse '{value}' as a number")]
    Number {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Engine(#[from] IfrError),
}

pub type Result<T, E = IfrError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors() {
        let e = IfrError::OutOfRange {
            model: "Picon".into(),
            age: 5.0,
            side: RangeSide::TooYoung,
        };
        assert!(e.is_recoverable());
        assert_eq!(e.to_string(), "Picon: no data, age 5 too young");

        let e = IfrError::UndefinedInterpolation {
            model: "Poletti".into(),
            age: 30.0,
        };
        assert!(e.is_recoverable());
        assert!(!IfrError::InsufficientData { age: 1.0 }.is_recoverable());
        assert!(!IfrError::domain("gap").is_recoverable());
    }

    #[test]
    fn engine_errors_convert_into_input_errors() {
        let e: InputError = IfrError::domain("gap at age 3").into();
        assert_eq!(e.to_string(), "invalid input: gap at age 3");
    }
}
