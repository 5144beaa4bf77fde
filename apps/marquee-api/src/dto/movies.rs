//! DTOs for movie endpoints

use chrono::{DateTime, Utc};
use marquee_domain::movies::value_objects::{
    AgeRestriction, AverageRating, Description, Duration, MovieName, ProductionCountry,
    ReleaseYear,
};
use marquee_domain::movies::{Movie, MovieBasic, MovieDetails, MovieError, MoviePatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::PageInfoDto;

/// Scalar attributes of a movie
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieBasicDto {
    #[schema(example = "Spirited Away")]
    pub movie_name: String,
    #[schema(example = "A girl wanders into the world of spirits")]
    pub description: String,
    #[schema(example = "2001")]
    pub release_year: String,
    /// Minutes
    #[schema(example = 125)]
    pub duration: i64,
    #[schema(example = 0)]
    pub age_restriction: i64,
    #[schema(example = 8.6)]
    pub average_rating: f64,
    #[schema(example = "Japan")]
    pub production_country: String,
}

impl TryFrom<MovieBasicDto> for MovieBasic {
    type Error = MovieError;

    fn try_from(dto: MovieBasicDto) -> Result<Self, Self::Error> {
        Ok(MovieBasic {
            name: MovieName::new(dto.movie_name)?,
            description: Description::new(dto.description),
            release_year: ReleaseYear::new(dto.release_year),
            duration: Duration::new(dto.duration),
            age_restriction: AgeRestriction::new(dto.age_restriction),
            average_rating: AverageRating::new(dto.average_rating),
            production_country: ProductionCountry::new(dto.production_country),
        })
    }
}

/// Child collections of a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MovieDetailsDto {
    #[schema(example = json!(["Tokyo"]))]
    pub production_locations: Vec<String>,
    #[schema(example = json!(["Hayao Miyazaki"]))]
    pub directors: Vec<String>,
    #[schema(example = json!(["Rumi Hiiragi", "Miyu Irino"]))]
    pub actors: Vec<String>,
    #[schema(example = json!(["Animation", "Fantasy"]))]
    pub categories: Vec<String>,
    #[schema(example = json!(["Japanese"]))]
    pub languages: Vec<String>,
    #[schema(example = json!(["English", "French"]))]
    pub subtitles: Vec<String>,
}

impl From<MovieDetailsDto> for MovieDetails {
    fn from(dto: MovieDetailsDto) -> Self {
        MovieDetails {
            production_locations: dto.production_locations,
            directors: dto.directors,
            actors: dto.actors,
            categories: dto.categories,
            languages: dto.languages,
            subtitles: dto.subtitles,
        }
    }
}

impl From<MovieDetails> for MovieDetailsDto {
    fn from(details: MovieDetails) -> Self {
        Self {
            production_locations: details.production_locations,
            directors: details.directors,
            actors: details.actors,
            categories: details.categories,
            languages: details.languages,
            subtitles: details.subtitles,
        }
    }
}

/// Request body for movie creation
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub basic: MovieBasicDto,
    #[serde(default)]
    pub details: MovieDetailsDto,
}

/// Request body for a partial movie update
///
/// Absent fields are left untouched. When `details` is present it replaces
/// every child collection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchMovieRequest {
    pub movie_name: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<String>,
    pub duration: Option<i64>,
    pub age_restriction: Option<i64>,
    pub average_rating: Option<f64>,
    pub production_country: Option<String>,
    pub details: Option<MovieDetailsDto>,
}

impl TryFrom<PatchMovieRequest> for MoviePatch {
    type Error = MovieError;

    fn try_from(dto: PatchMovieRequest) -> Result<Self, Self::Error> {
        Ok(MoviePatch {
            name: dto.movie_name.map(MovieName::new).transpose()?,
            description: dto.description.map(Description::new),
            release_year: dto.release_year.map(ReleaseYear::new),
            duration: dto.duration.map(Duration::new),
            age_restriction: dto.age_restriction.map(AgeRestriction::new),
            average_rating: dto.average_rating.map(AverageRating::new),
            production_country: dto.production_country.map(ProductionCountry::new),
            details: dto.details.map(MovieDetails::from),
        })
    }
}

/// Request body for a criteria search
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchMoviesRequest {
    /// Loose filter map: `min-duration`, `max-duration`, `productionLocations`
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"min-duration": 90, "productionLocations": ["Tokyo"]}))]
    pub filters: Map<String, Value>,
    /// Sort field, required
    #[schema(example = "releaseYear")]
    pub sort: Option<String>,
    /// `asc` or `desc`, required
    #[schema(example = "desc")]
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// A movie as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieResponse {
    #[schema(example = "01920000-0000-7000-8000-000000000000")]
    pub id: String,
    pub basic: MovieBasicDto,
    pub details: MovieDetailsDto,
    pub created_at: DateTime<Utc>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id().to_string(),
            basic: MovieBasicDto {
                movie_name: movie.name().as_str().to_string(),
                description: movie.description().as_str().to_string(),
                release_year: movie.release_year().as_str().to_string(),
                duration: movie.duration().value(),
                age_restriction: movie.age_restriction().value(),
                average_rating: movie.average_rating().value(),
                production_country: movie.production_country().as_str().to_string(),
            },
            details: movie.grouped_details().into(),
            created_at: *movie.created_at(),
        }
    }
}

/// One page of movies
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieListResponse {
    pub items: Vec<MovieResponse>,
    /// Absent for criteria searches, whose matches are not counted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfoDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults_missing_details() {
        let request: CreateMovieRequest = serde_json::from_value(json!({
            "basic": {
                "movie_name": "Ran",
                "description": "King Lear in feudal Japan",
                "release_year": "1985",
                "duration": 162,
                "age_restriction": 12,
                "average_rating": 8.2,
                "production_country": "Japan"
            },
            "details": {"directors": ["Akira Kurosawa"]}
        }))
        .unwrap();

        assert_eq!(request.details.directors, vec!["Akira Kurosawa"]);
        assert!(request.details.actors.is_empty());

        let basic = MovieBasic::try_from(request.basic).unwrap();
        assert_eq!(basic.name.as_str(), "Ran");
    }

    #[test]
    fn test_blank_name_in_patch_is_rejected() {
        let patch = PatchMovieRequest {
            movie_name: Some("   ".into()),
            ..Default::default()
        };

        assert!(matches!(
            MoviePatch::try_from(patch),
            Err(MovieError::InvalidData(_))
        ));
    }
}
