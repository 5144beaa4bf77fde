//! # Marquee SQL Adapter
//!
//! SQLite implementations of the movie and rating repository ports and of
//! the transaction port, built on `sqlx`.
//!
//! A [`SqlSession`] is created per request over a shared pool and owns that
//! request's transaction state. Repositories borrow the session through an
//! `Arc`, so statements issued by a use case run inside the transaction the
//! use case opened.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use marquee_sql::{connect, SqlMovieRepository, SqlSession, MIGRATOR};
//!
//! # async fn example() -> Result<(), marquee_sql::SqlError> {
//! let pool = connect("sqlite://marquee.db", 5).await?;
//! MIGRATOR.run(&pool).await?;
//!
//! let session = Arc::new(SqlSession::new(pool));
//! let movies = SqlMovieRepository::new(session.clone());
//! # drop(movies);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod infrastructure;

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub use error::{Result, SqlError};
pub use infrastructure::{SqlMovieRepository, SqlRatingRepository, SqlSession};

/// Schema migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a connection pool, creating the database file when missing
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(database_url = %database_url, max_connections, "Connected to SQLite");
    Ok(pool)
}
