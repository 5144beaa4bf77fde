//! # Marquee Domain Layer
//!
//! Pure business logic for the Marquee movie catalog and rating backend,
//! organised along hexagonal architecture lines:
//!
//! - **Aggregates**: `Movie` (with its child entries) and `Rating`
//! - **Ports**: `MovieRepository`, `RatingRepository`, `TransactionManager`
//! - **Services**: use-case orchestration over the ports
//!
//! ## Architecture
//!
//! This crate has no dependency on storage or HTTP. Adapters live in
//! `marquee-sql` (relational) and `marquee-memory` (in-memory), and the API
//! binary wires one of them in.
//!
//! ## Example
//!
//! ```rust
//! use marquee_domain::movies::{MovieRepository, MovieService};
//! use marquee_domain::search::{PageRequest, Sort};
//! use marquee_domain::TransactionManager;
//!
//! // The service is generic over any repository and transaction manager
//! async fn first_page<R: MovieRepository, T: TransactionManager>(service: MovieService<R, T>) {
//!     let page = PageRequest::new(1, 10).unwrap();
//!     let movies = service.search(page, Sort::default()).await.unwrap();
//!     println!("{} movies on the first page", movies.len());
//! }
//! ```

pub mod ids;
pub mod movies;
pub mod pagination;
pub mod ratings;
pub mod search;
pub mod transaction;

// Re-export commonly used types
pub use ids::{DetailId, IdParseError, MovieId, RatingId, UserId};
pub use movies::{Movie, MovieError, MovieRepository, MovieService};
pub use pagination::{PageInfo, PaginationError, Paginator};
pub use ratings::{Rating, RatingError, RatingRepository, RatingService};
pub use search::{PageRequest, Sort, SortOrder};
pub use transaction::{TransactionError, TransactionManager};
