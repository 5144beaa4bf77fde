//! Criteria search over the movie catalog
//!
//! Clients send a loose JSON filter map. It is parsed once, here, into typed
//! [`MovieFilter`] values; adapters then either translate the filters into
//! query constraints or evaluate them against loaded movies.
//!
//! Recognised keys are `min-duration`, `max-duration` and
//! `productionLocations`. Any other key is ignored.

use serde_json::{Map, Value};

use super::entity::Movie;
use super::error::MovieError;
use super::sort::MovieSortField;
use crate::search::{PageRequest, Sort};

pub const MIN_DURATION_KEY: &str = "min-duration";
pub const MAX_DURATION_KEY: &str = "max-duration";
pub const PRODUCTION_LOCATIONS_KEY: &str = "productionLocations";

/// One typed constraint on the movie set
#[derive(Debug, Clone, PartialEq)]
pub enum MovieFilter {
    /// `duration >= min` and `duration <= max`, each bound optional
    Duration { min: Option<i64>, max: Option<i64> },

    /// At least one production location is in the list
    ProductionLocations(Vec<String>),
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            MovieFilter::Duration { min, max } => {
                let duration = movie.duration().value();
                min.map_or(true, |min| duration >= min) && max.map_or(true, |max| duration <= max)
            }
            MovieFilter::ProductionLocations(locations) => movie
                .production_locations()
                .any(|location| locations.iter().any(|wanted| wanted == location)),
        }
    }
}

/// A conjunction of filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieCriteria {
    filters: Vec<MovieFilter>,
}

impl MovieCriteria {
    pub fn new(filters: Vec<MovieFilter>) -> Self {
        Self { filters }
    }

    /// Parse the loose filter map
    ///
    /// The duration filter is only built when `min-duration` or
    /// `max-duration` holds a non-empty value (not null, `0`, `""`, `"0"`,
    /// `false` or an empty array). Once built, a positive minimum becomes
    /// `duration >= min` and any present maximum, `0` included, becomes
    /// `duration <= max`. So `{"max-duration": 0}` alone filters nothing
    /// while `{"min-duration": 5, "max-duration": 0}` matches no movie.
    ///
    /// # Errors
    ///
    /// `MovieError::InvalidData` when a recognised key holds a value of the
    /// wrong JSON type.
    pub fn from_filters(filters: &Map<String, Value>) -> Result<Self, MovieError> {
        let mut parsed = Vec::new();

        let min = filters.get(MIN_DURATION_KEY);
        let max = filters.get(MAX_DURATION_KEY);
        if min.is_some_and(is_non_empty) || max.is_some_and(is_non_empty) {
            let min = match min {
                Some(value) if is_non_empty(value) => {
                    Some(integer_filter(MIN_DURATION_KEY, value)?).filter(|min| *min > 0)
                }
                _ => None,
            };
            let max = match max {
                Some(Value::Null) | None => None,
                Some(value) if !is_non_empty(value) => Some(0),
                Some(value) => Some(integer_filter(MAX_DURATION_KEY, value)?),
            };
            parsed.push(MovieFilter::Duration { min, max });
        }

        if let Some(value) = filters.get(PRODUCTION_LOCATIONS_KEY) {
            let locations = string_list_filter(PRODUCTION_LOCATIONS_KEY, value)?;
            if !locations.is_empty() {
                parsed.push(MovieFilter::ProductionLocations(locations));
            }
        }

        Ok(Self { filters: parsed })
    }

    pub fn filters(&self) -> &[MovieFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a movie satisfies every filter
    pub fn matches(&self, movie: &Movie) -> bool {
        self.filters.iter().all(|filter| filter.matches(movie))
    }
}

/// A validated criteria search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMoviesByCriteria {
    pub criteria: MovieCriteria,
    pub sort: Sort<MovieSortField>,
    pub page: PageRequest,
}

impl SearchMoviesByCriteria {
    /// Validate the raw request fields
    ///
    /// `sort` and `order` are mandatory for this query; blank values count as
    /// missing and are all reported together.
    pub fn parse(
        filters: &Map<String, Value>,
        sort: Option<&str>,
        order: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> Result<Self, MovieError> {
        let sort = sort.map(str::trim).filter(|s| !s.is_empty());
        let order = order.map(str::trim).filter(|s| !s.is_empty());

        let (sort, order) = match (sort, order) {
            (Some(sort), Some(order)) => (sort, order),
            (sort, order) => {
                let missing = [("sort", sort.is_none()), ("order", order.is_none())]
                    .into_iter()
                    .filter_map(|(name, missing)| missing.then_some(name));
                return Err(MovieError::missing_attributes(missing));
            }
        };

        Ok(Self {
            criteria: MovieCriteria::from_filters(filters)?,
            sort: Sort::parse(sort, order).map_err(MovieError::invalid_data)?,
            page: PageRequest::new(page, per_page)?,
        })
    }
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn integer_filter(key: &str, value: &Value) -> Result<i64, MovieError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        MovieError::invalid_data(format!("Filter '{}' must be an integer, got {}", key, value))
    })
}

fn string_list_filter(key: &str, value: &Value) -> Result<Vec<String>, MovieError> {
    let invalid = || {
        MovieError::invalid_data(format!(
            "Filter '{}' must be a list of strings, got {}",
            key, value
        ))
    };

    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}
