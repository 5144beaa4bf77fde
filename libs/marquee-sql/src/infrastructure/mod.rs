pub mod criteria;
mod movie_repository;
mod rating_repository;
mod rows;
mod session;

pub use movie_repository::SqlMovieRepository;
pub use rating_repository::SqlRatingRepository;
pub use session::SqlSession;

use marquee_domain::search::PageRequest;

/// `(LIMIT, OFFSET)` for a page, `None` when the offset does not fit SQLite's
/// signed integers and the page lies past any table
pub(crate) fn limit_offset(page: &PageRequest) -> Option<(i64, i64)> {
    let limit = i64::try_from(page.limit()).ok()?;
    let offset = i64::try_from(page.offset()).ok()?;
    Some((limit, offset))
}
