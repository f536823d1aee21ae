use std::fmt::Display;
use std::time::Duration;

use crate::{Error, Result};

/// A CPU occupancy fraction in `0.0..=1.0`.
///
/// The fraction is stored fixed-point as an integer numerator out of [`DutyRate::BASE`],
/// so copies of a rate never drift and splitting a control period into busy and idle
/// portions is exact integer arithmetic.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DutyRate {
    numerator: u16,
}

impl DutyRate {
    /// The fixed-point denominator. A rate of 1.0 is stored as this many parts.
    pub const BASE: u32 = 10_000;

    /// A rate of 0.0 - a worker at this rate only ever sleeps.
    pub const ZERO: Self = Self { numerator: 0 };

    /// A rate of 1.0 - a worker at this rate saturates one logical processor.
    pub const FULL: Self = Self { numerator: 10_000 };

    /// Creates a rate from a fraction in `0.0..=1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RateOutOfRange`] if the value is outside `0.0..=1.0` (including NaN).
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is validated to 0.0..=1.0, so the scaled numerator fits in u16"
    )]
    pub fn from_fraction(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::RateOutOfRange { value });
        }

        Ok(Self {
            numerator: (value * f64::from(Self::BASE)).round() as u16,
        })
    }

    /// The rate as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn as_fraction(self) -> f64 {
        f64::from(self.numerator) / f64::from(Self::BASE)
    }

    /// The rate as a percentage in `0.0..=100.0`.
    #[must_use]
    pub fn as_percent(self) -> f64 {
        f64::from(self.numerator) / 100.0
    }

    /// The portion of `period` covered by this rate, computed in exact integer arithmetic.
    ///
    /// This is the length of the busy phase when `period` is the duty cycle control period.
    #[must_use]
    pub fn portion_of(self, period: Duration) -> Duration {
        period * u32::from(self.numerator) / Self::BASE
    }
}

impl Display for DutyRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.as_percent())
    }
}
