//! The Movie aggregate
//!
//! A Movie owns its child entries (directors, actors, categories, languages,
//! subtitles, production locations). Children are kept in a single ordered
//! arena of [`MovieDetail`] values; each entry records the id of the movie
//! that owns it instead of pointing back at it.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value_objects::{
    AgeRestriction, AverageRating, Description, Duration, MovieName, ProductionCountry,
    ReleaseYear,
};
use crate::ids::{DetailId, MovieId};

/// Which child collection a detail entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    ProductionLocation,
    Director,
    Actor,
    Category,
    Language,
    Subtitle,
}

impl DetailKind {
    pub const ALL: [DetailKind; 6] = [
        DetailKind::ProductionLocation,
        DetailKind::Director,
        DetailKind::Actor,
        DetailKind::Category,
        DetailKind::Language,
        DetailKind::Subtitle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailKind::ProductionLocation => "production_location",
            DetailKind::Director => "director",
            DetailKind::Actor => "actor",
            DetailKind::Category => "category",
            DetailKind::Language => "language",
            DetailKind::Subtitle => "subtitle",
        }
    }
}

impl FromStr for DetailKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown movie detail kind '{}'", s))
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One child entry of a movie (a single director, a single language...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    id: DetailId,
    movie_id: MovieId,
    kind: DetailKind,
    value: String,
}

impl MovieDetail {
    pub fn new(movie_id: MovieId, kind: DetailKind, value: impl Into<String>) -> Self {
        Self {
            id: DetailId::new(),
            movie_id,
            kind,
            value: value.into(),
        }
    }

    /// Rebuild an entry loaded from storage
    pub fn from_parts(id: DetailId, movie_id: MovieId, kind: DetailKind, value: String) -> Self {
        Self {
            id,
            movie_id,
            kind,
            value,
        }
    }

    pub fn id(&self) -> &DetailId {
        &self.id
    }

    /// The movie owning this entry
    pub fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }

    pub fn kind(&self) -> DetailKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Child collections of a movie, grouped by kind
///
/// This is the input shape for creating or replacing details and the output
/// shape handed to the API layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub production_locations: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub subtitles: Vec<String>,
}

impl MovieDetails {
    pub fn values(&self, kind: DetailKind) -> &[String] {
        match kind {
            DetailKind::ProductionLocation => &self.production_locations,
            DetailKind::Director => &self.directors,
            DetailKind::Actor => &self.actors,
            DetailKind::Category => &self.categories,
            DetailKind::Language => &self.languages,
            DetailKind::Subtitle => &self.subtitles,
        }
    }

    fn values_mut(&mut self, kind: DetailKind) -> &mut Vec<String> {
        match kind {
            DetailKind::ProductionLocation => &mut self.production_locations,
            DetailKind::Director => &mut self.directors,
            DetailKind::Actor => &mut self.actors,
            DetailKind::Category => &mut self.categories,
            DetailKind::Language => &mut self.languages,
            DetailKind::Subtitle => &mut self.subtitles,
        }
    }
}

/// Scalar attributes of a movie
#[derive(Debug, Clone, PartialEq)]
pub struct MovieBasic {
    pub name: MovieName,
    pub description: Description,
    pub release_year: ReleaseYear,
    pub duration: Duration,
    pub age_restriction: AgeRestriction,
    pub average_rating: AverageRating,
    pub production_country: ProductionCountry,
}

/// Partial update of a movie
///
/// `None` keeps the current value. `details: Some(..)` replaces every child
/// collection wholesale, including collections left empty in the patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub name: Option<MovieName>,
    pub description: Option<Description>,
    pub release_year: Option<ReleaseYear>,
    pub duration: Option<Duration>,
    pub age_restriction: Option<AgeRestriction>,
    pub average_rating: Option<AverageRating>,
    pub production_country: Option<ProductionCountry>,
    pub details: Option<MovieDetails>,
}

/// A catalog movie
///
/// # Example
///
/// ```rust
/// use marquee_domain::movies::{Movie, MovieBasic, MovieDetails};
/// use marquee_domain::movies::value_objects::*;
///
/// let movie = Movie::create(
///     MovieBasic {
///         name: MovieName::new("Alien").unwrap(),
///         description: Description::new("In space no one can hear you scream"),
///         release_year: ReleaseYear::new("1979"),
///         duration: Duration::new(117),
///         age_restriction: AgeRestriction::new(16),
///         average_rating: AverageRating::new(8.5),
///         production_country: ProductionCountry::new("UK"),
///     },
///     MovieDetails {
///         directors: vec!["Ridley Scott".to_string()],
///         ..Default::default()
///     },
/// );
///
/// assert_eq!(movie.directors().collect::<Vec<_>>(), vec!["Ridley Scott"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    id: MovieId,
    name: MovieName,
    description: Description,
    release_year: ReleaseYear,
    duration: Duration,
    age_restriction: AgeRestriction,
    average_rating: AverageRating,
    production_country: ProductionCountry,
    details: Vec<MovieDetail>,
    created_at: DateTime<Utc>,
}

impl Movie {
    /// Create a new movie with a fresh id and creation timestamp
    ///
    /// The timestamp is truncated to microseconds, the precision kept by the
    /// relational store, so a stored movie compares equal once reloaded.
    pub fn create(basic: MovieBasic, details: MovieDetails) -> Self {
        let mut movie = Self {
            id: MovieId::new(),
            name: basic.name,
            description: basic.description,
            release_year: basic.release_year,
            duration: basic.duration,
            age_restriction: basic.age_restriction,
            average_rating: basic.average_rating,
            production_country: basic.production_country,
            details: Vec::new(),
            created_at: Utc::now().trunc_subsecs(6),
        };
        movie.replace_details(&details);
        movie
    }

    /// Rebuild a movie loaded from storage
    pub fn from_parts(
        id: MovieId,
        basic: MovieBasic,
        details: Vec<MovieDetail>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: basic.name,
            description: basic.description,
            release_year: basic.release_year,
            duration: basic.duration,
            age_restriction: basic.age_restriction,
            average_rating: basic.average_rating,
            production_country: basic.production_country,
            details,
            created_at,
        }
    }

    /// Apply a partial update
    pub fn update(&mut self, patch: MoviePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(release_year) = patch.release_year {
            self.release_year = release_year;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(age_restriction) = patch.age_restriction {
            self.age_restriction = age_restriction;
        }
        if let Some(average_rating) = patch.average_rating {
            self.average_rating = average_rating;
        }
        if let Some(production_country) = patch.production_country {
            self.production_country = production_country;
        }
        if let Some(details) = patch.details {
            self.replace_details(&details);
        }
    }

    fn replace_details(&mut self, details: &MovieDetails) {
        let movie_id = self.id;
        self.details = DetailKind::ALL
            .into_iter()
            .flat_map(|kind| {
                details
                    .values(kind)
                    .iter()
                    .map(move |value| MovieDetail::new(movie_id, kind, value.clone()))
            })
            .collect();
    }

    pub fn id(&self) -> &MovieId {
        &self.id
    }

    pub fn name(&self) -> &MovieName {
        &self.name
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn release_year(&self) -> &ReleaseYear {
        &self.release_year
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn age_restriction(&self) -> AgeRestriction {
        self.age_restriction
    }

    pub fn average_rating(&self) -> AverageRating {
        self.average_rating
    }

    pub fn production_country(&self) -> &ProductionCountry {
        &self.production_country
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    /// All child entries, in insertion order
    pub fn details(&self) -> &[MovieDetail] {
        &self.details
    }

    /// Values of one child collection, in insertion order
    pub fn detail_values(&self, kind: DetailKind) -> impl Iterator<Item = &str> {
        self.details
            .iter()
            .filter(move |detail| detail.kind == kind)
            .map(|detail| detail.value.as_str())
    }

    pub fn production_locations(&self) -> impl Iterator<Item = &str> {
        self.detail_values(DetailKind::ProductionLocation)
    }

    pub fn directors(&self) -> impl Iterator<Item = &str> {
        self.detail_values(DetailKind::Director)
    }

    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.detail_values(DetailKind::Actor)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.detail_values(DetailKind::Category)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.detail_values(DetailKind::Language)
    }

    pub fn subtitles(&self) -> impl Iterator<Item = &str> {
        self.detail_values(DetailKind::Subtitle)
    }

    /// Child collections grouped by kind
    pub fn grouped_details(&self) -> MovieDetails {
        let mut grouped = MovieDetails::default();
        for detail in &self.details {
            grouped.values_mut(detail.kind).push(detail.value.clone());
        }
        grouped
    }
}
