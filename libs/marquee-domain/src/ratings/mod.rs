//! User rating domain module

mod entity;
mod error;
mod ports;
mod service;
pub mod value_objects;

pub use entity::{Rating, RatingSortField};
pub use error::{RatingError, Result};
pub use ports::RatingRepository;
pub use service::RatingService;
pub use value_objects::AverageRating;
