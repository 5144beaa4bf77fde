//! Validated rating score

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RatingError;

/// A user's score for a movie, within `[0.0, 10.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AverageRating(f64);

impl AverageRating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Validate a score
    ///
    /// # Errors
    ///
    /// Returns `RatingError::InvalidAverageRating` for values outside the
    /// inclusive range, NaN included.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::InvalidAverageRating(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for AverageRating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AverageRating> for f64 {
    fn from(rating: AverageRating) -> Self {
        rating.0
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
