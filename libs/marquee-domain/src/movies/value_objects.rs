//! Value objects owned by the Movie aggregate

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::MovieError;

/// Title of a movie, unique across the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MovieName(String);

impl MovieName {
    /// Build a movie name, rejecting blank titles
    ///
    /// Surrounding whitespace is trimmed so `" Alien "` and `"Alien"` collide
    /// on the uniqueness constraint.
    pub fn new(name: impl Into<String>) -> Result<Self, MovieError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(MovieError::invalid_data("Movie name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MovieName {
    type Error = MovieError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MovieName> for String {
    fn from(name: MovieName) -> Self {
        name.0
    }
}

impl fmt::Display for MovieName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_value!(
    /// Free-form synopsis
    Description
);

text_value!(
    /// Release year as entered by the editor
    ///
    /// Kept as text: catalog entries carry values like `"1999"` as well as
    /// `"circa 1920"`. Sorting on it is lexicographic.
    ReleaseYear
);

text_value!(
    /// Main production country
    ProductionCountry
);

macro_rules! integer_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_value!(
    /// Running time in minutes
    Duration
);

integer_value!(
    /// Minimum viewer age
    AgeRestriction
);

/// Catalog-level average rating of a movie
///
/// Unlike a user's rating this value is not range-checked here: it is an
/// editorial figure copied from the source catalog.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AverageRating(f64);

impl AverageRating {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_name_rejects_blank() {
        assert!(MovieName::new("").is_err());
        assert!(MovieName::new("   ").is_err());
    }

    #[test]
    fn test_movie_name_is_trimmed() {
        let name = MovieName::new("  Alien ").unwrap();
        assert_eq!(name.as_str(), "Alien");
        assert_eq!(name, MovieName::new("Alien").unwrap());
    }

    #[test]
    fn test_movie_name_deserialization_validates() {
        let ok: MovieName = serde_json::from_str("\"Heat\"").unwrap();
        assert_eq!(ok.as_str(), "Heat");

        assert!(serde_json::from_str::<MovieName>("\"\"").is_err());
    }

    #[test]
    fn test_movie_average_rating_is_unbounded() {
        assert_eq!(AverageRating::new(11.5).value(), 11.5);
        assert_eq!(AverageRating::new(-1.0).value(), -1.0);
    }
}
