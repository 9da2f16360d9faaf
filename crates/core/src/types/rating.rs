//! Testimonial star rating.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// The input is not a whole number.
    #[error("rating must be a whole number from 1 to 5")]
    NotANumber,
}

/// A star rating from 1 to 5.
///
/// Out-of-range values are clamped rather than rejected, both from form input
/// and from rows already in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating.
    pub const MIN: u8 = 1;
    /// Highest rating.
    pub const MAX: u8 = 5;

    /// Clamp any integer into the 1-5 range.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX))
    }

    /// Parse a rating from form input, clamping to 1-5.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::NotANumber`] if the input is not an integer.
    pub fn parse(s: &str) -> Result<Self, RatingError> {
        s.trim()
            .parse::<i64>()
            .map(Self::clamped)
            .map_err(|_| RatingError::NotANumber)
    }

    /// The rating as a number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Rating::clamped(0).stars(), 1);
        assert_eq!(Rating::clamped(-7).stars(), 1);
        assert_eq!(Rating::clamped(9).stars(), 5);
        assert_eq!(Rating::clamped(3).stars(), 3);
    }

    #[test]
    fn test_parse_form_input() {
        assert_eq!(Rating::parse(" 4 ").unwrap().stars(), 4);
        assert_eq!(Rating::parse("12").unwrap().stars(), 5);
        assert_eq!(Rating::parse("four"), Err(RatingError::NotANumber));
    }

    #[test]
    fn test_deserialize_clamps_stored_values() {
        let rating: Rating = serde_json::from_str("7").unwrap();
        assert_eq!(rating.stars(), 5);
        assert_eq!(serde_json::to_string(&Rating::clamped(2)).unwrap(), "2");
    }
}
