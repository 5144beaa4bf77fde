use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::entity::Movie;

/// Movie attributes a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieSortField {
    MovieName,
    ReleaseYear,
    Duration,
    AgeRestriction,
    AverageRating,
    CreatedAt,
}

impl MovieSortField {
    /// Canonical camelCase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieSortField::MovieName => "movieName",
            MovieSortField::ReleaseYear => "releaseYear",
            MovieSortField::Duration => "duration",
            MovieSortField::AgeRestriction => "ageRestriction",
            MovieSortField::AverageRating => "averageRating",
            MovieSortField::CreatedAt => "createdAt",
        }
    }

    /// Compare two movies on this field, ascending
    pub fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        match self {
            MovieSortField::MovieName => a.name().as_str().cmp(b.name().as_str()),
            MovieSortField::ReleaseYear => a.release_year().as_str().cmp(b.release_year().as_str()),
            MovieSortField::Duration => a.duration().cmp(&b.duration()),
            MovieSortField::AgeRestriction => a.age_restriction().cmp(&b.age_restriction()),
            MovieSortField::AverageRating => a
                .average_rating()
                .value()
                .total_cmp(&b.average_rating().value()),
            MovieSortField::CreatedAt => a.created_at().cmp(b.created_at()),
        }
    }
}

impl FromStr for MovieSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movieName" | "movie_name" | "name" => Ok(MovieSortField::MovieName),
            "releaseYear" | "release_year" => Ok(MovieSortField::ReleaseYear),
            "duration" => Ok(MovieSortField::Duration),
            "ageRestriction" | "age_restriction" => Ok(MovieSortField::AgeRestriction),
            "averageRating" | "average_rating" => Ok(MovieSortField::AverageRating),
            "createdAt" | "created_at" => Ok(MovieSortField::CreatedAt),
            other => Err(format!("Unknown movie sort field '{}'", other)),
        }
    }
}

impl fmt::Display for MovieSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_accepts_both_casings() {
        assert_eq!(
            "releaseYear".parse::<MovieSortField>().unwrap(),
            MovieSortField::ReleaseYear
        );
        assert_eq!(
            "release_year".parse::<MovieSortField>().unwrap(),
            MovieSortField::ReleaseYear
        );
        assert!("releaseDate".parse::<MovieSortField>().is_err());
    }
}
