use thiserror::Error;

use crate::constants::Seconds;

#[derive(Error, Debug, Clone)]
pub enum FastEcefError {
    #[error("Invalid input: {what} must be finite, got {value}")]
    InvalidInput { what: &'static str, value: f64 },

    #[error("Invalid input: {what} = {value} is out of range (expected {expected})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("No reference rotation available at epoch {epoch} s: {reason}")]
    Domain { epoch: Seconds, reason: String },

    #[error("Invalid campaign parameter: {0}")]
    InvalidCampaignParameter(String),

    #[error("Cannot derive an angular rate: {0}")]
    DegenerateRateDerivation(String),
}

impl FastEcefError {
    /// Return `Ok(value)` when `value` is finite, otherwise an
    /// [`FastEcefError::InvalidInput`] naming the offending quantity.
    pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<f64, FastEcefError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FastEcefError::InvalidInput { what, value })
        }
    }

    /// `true` for the reference-model failure kind.
    pub fn is_domain(&self) -> bool {
        matches!(self, FastEcefError::Domain { .. })
    }
}

impl PartialEq for FastEcefError {
    fn eq(&self, other: &Self) -> bool {
        use FastEcefError::*;
        match (self, other) {
            // NaN payloads compare equal when they name the same quantity
            (InvalidInput { what: a, value: x }, InvalidInput { what: b, value: y }) => {
                a == b && (x == y || (x.is_nan() && y.is_nan()))
            }
            (
                OutOfRange {
                    what: a,
                    value: x,
                    expected: e,
                },
                OutOfRange {
                    what: b,
                    value: y,
                    expected: f,
                },
            ) => a == b && e == f && x == y,
            (Domain { epoch: a, reason: r }, Domain { epoch: b, reason: s }) => a == b && r == s,
            (InvalidCampaignParameter(a), InvalidCampaignParameter(b)) => a == b,
            (DegenerateRateDerivation(a), DegenerateRateDerivation(b)) => a == b,
            _ => false,
        }
    }
}
