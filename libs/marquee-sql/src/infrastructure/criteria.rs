//! Criteria applicators
//!
//! Each applicator turns one kind of [`MovieFilter`] into SQL constraints on a
//! `QueryBuilder` that already ends in a `WHERE` clause over `movies m`.
//! Constraints are appended as `AND ...` fragments.

use marquee_domain::movies::{DetailKind, MovieCriteria, MovieFilter};
use sqlx::{QueryBuilder, Sqlite};

/// Adds the constraints for the filters it supports
pub trait CriteriaApplicator: Send + Sync {
    fn supports(&self, filter: &MovieFilter) -> bool;

    fn apply(&self, filter: &MovieFilter, builder: &mut QueryBuilder<'_, Sqlite>);
}

/// `duration >= min` and `duration <= max`
pub struct DurationCriteriaApplicator;

impl CriteriaApplicator for DurationCriteriaApplicator {
    fn supports(&self, filter: &MovieFilter) -> bool {
        matches!(filter, MovieFilter::Duration { .. })
    }

    fn apply(&self, filter: &MovieFilter, builder: &mut QueryBuilder<'_, Sqlite>) {
        let MovieFilter::Duration { min, max } = filter else {
            return;
        };

        if let Some(min) = min.filter(|min| *min > 0) {
            builder.push(" AND m.duration >= ").push_bind(min);
        }
        if let Some(max) = max {
            builder.push(" AND m.duration <= ").push_bind(*max);
        }
    }
}

/// Keeps movies with at least one production location in the list
pub struct ProductionLocationsCriteriaApplicator;

impl CriteriaApplicator for ProductionLocationsCriteriaApplicator {
    fn supports(&self, filter: &MovieFilter) -> bool {
        matches!(filter, MovieFilter::ProductionLocations(_))
    }

    fn apply(&self, filter: &MovieFilter, builder: &mut QueryBuilder<'_, Sqlite>) {
        let MovieFilter::ProductionLocations(locations) = filter else {
            return;
        };
        if locations.is_empty() {
            return;
        }

        // Semi-join so a movie shot in several listed places comes back once
        builder
            .push(" AND EXISTS (SELECT 1 FROM movie_details d WHERE d.movie_id = m.id AND d.kind = ")
            .push_bind(DetailKind::ProductionLocation.as_str().to_string())
            .push(" AND d.value IN (");
        let mut values = builder.separated(", ");
        for location in locations {
            values.push_bind(location.clone());
        }
        values.push_unseparated("))");
    }
}

/// Dispatches every filter of a criteria set to the applicator handling it
pub struct MovieCriteriaApplicator {
    applicators: Vec<Box<dyn CriteriaApplicator>>,
}

impl Default for MovieCriteriaApplicator {
    fn default() -> Self {
        Self {
            applicators: vec![
                Box::new(DurationCriteriaApplicator),
                Box::new(ProductionLocationsCriteriaApplicator),
            ],
        }
    }
}

impl MovieCriteriaApplicator {
    pub fn apply(&self, criteria: &MovieCriteria, builder: &mut QueryBuilder<'_, Sqlite>) {
        for filter in criteria.filters() {
            if let Some(applicator) = self.applicators.iter().find(|a| a.supports(filter)) {
                applicator.apply(filter, builder);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql_for(filters: serde_json::Value) -> String {
        let criteria = MovieCriteria::from_filters(filters.as_object().unwrap()).unwrap();
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT m.id FROM movies m WHERE 1 = 1");
        MovieCriteriaApplicator::default().apply(&criteria, &mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_duration_range_sql() {
        assert_eq!(
            sql_for(json!({"min-duration": 10, "max-duration": 60})),
            "SELECT m.id FROM movies m WHERE 1 = 1 AND m.duration >= ? AND m.duration <= ?"
        );
    }

    #[test]
    fn test_zero_min_duration_adds_nothing() {
        assert_eq!(
            sql_for(json!({"min-duration": 0})),
            "SELECT m.id FROM movies m WHERE 1 = 1"
        );
    }

    #[test]
    fn test_production_locations_sql() {
        assert_eq!(
            sql_for(json!({"productionLocations": ["Paris", "Rome"]})),
            "SELECT m.id FROM movies m WHERE 1 = 1 AND EXISTS (SELECT 1 FROM movie_details d \
             WHERE d.movie_id = m.id AND d.kind = ? AND d.value IN (?, ?))"
        );
    }
}
