//! Sorting and page requests shared by both aggregates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pagination::PaginationError;

/// Direction of a sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order '{}', expected 'asc' or 'desc'", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// A requested ordering over the sortable fields `F` of an aggregate
///
/// `field: None` means primary-key order. Adapters always append the id as a
/// tie-breaker so equal sort keys come back in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: Option<F>,
    pub order: SortOrder,
}

impl<F> Default for Sort<F> {
    fn default() -> Self {
        Self {
            field: None,
            order: SortOrder::Asc,
        }
    }
}

impl<F> Sort<F>
where
    F: FromStr<Err = String>,
{
    pub fn by(field: F, order: SortOrder) -> Self {
        Self {
            field: Some(field),
            order,
        }
    }

    /// Parse the loose `sort_by` / `sort_order` pair received at the API boundary
    ///
    /// Empty strings fall back to primary-key order and ascending direction.
    pub fn parse(sort_by: &str, sort_order: &str) -> Result<Self, String> {
        let field = match sort_by.trim() {
            "" => None,
            name => Some(name.parse::<F>()?),
        };
        let order = match sort_order.trim() {
            "" => SortOrder::Asc,
            order => order.parse()?,
        };

        Ok(Self { field, order })
    }
}

/// Validated `(page, per_page)` pair
///
/// Pages are 1-based. The repository turns this into
/// `offset = (page - 1) * per_page` and `limit = per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Result<Self, PaginationError> {
        if page < 1 || page > u32::MAX as i64 {
            return Err(PaginationError::InvalidPage(page));
        }
        if per_page < 1 || per_page > u32::MAX as i64 {
            return Err(PaginationError::InvalidItemsPerPage(per_page));
        }

        Ok(Self {
            page: page as u32,
            per_page: per_page as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    pub fn limit(&self) -> u64 {
        self.per_page as u64
    }
}
