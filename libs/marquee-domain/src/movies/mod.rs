//! Movie catalog domain module
//!
//! The Movie aggregate, its value objects, the criteria search model, the
//! repository port and the use-case service.

pub mod criteria;
mod entity;
mod error;
mod ports;
mod service;
mod sort;
pub mod value_objects;

pub use criteria::{MovieCriteria, MovieFilter, SearchMoviesByCriteria};
pub use entity::{DetailKind, Movie, MovieBasic, MovieDetail, MovieDetails, MoviePatch};
pub use error::{MovieError, Result};
pub use ports::MovieRepository;
pub use service::MovieService;
pub use sort::MovieSortField;
