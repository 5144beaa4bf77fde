//! # Marquee In-Memory Adapter
//!
//! Map-backed implementations of the movie and rating repository ports, with
//! snapshot transactions. Meant for tests and local experiments: nothing is
//! persisted and each repository keeps its own map.
//!
//! ## Example
//!
//! ```rust
//! use marquee_domain::movies::MovieService;
//! use marquee_memory::InMemoryMovieRepository;
//!
//! let repository = InMemoryMovieRepository::new();
//! let service = MovieService::new(repository.clone(), repository.transactions());
//! # drop(service);
//! ```

mod movies;
mod ratings;
pub mod store;

pub use movies::InMemoryMovieRepository;
pub use ratings::InMemoryRatingRepository;
pub use store::InMemoryStore;
