//! Request and response bodies

pub mod movies;
pub mod ratings;

use marquee_domain::PageInfo;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Movie 01920000-0000-7000-8000-000000000000 not found")]
    pub error: String,
}

/// Query string of the paginated list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<i64>,
    /// Items per page, defaults to the configured page size
    pub per_page: Option<i64>,
    /// Field to sort on, primary-key order when absent
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
}

/// Page metadata returned next to list results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageInfoDto {
    #[schema(example = 1)]
    pub current_page: u64,
    #[schema(example = 10)]
    pub items_per_page: u64,
    #[schema(example = 3)]
    pub last_page: u64,
    #[schema(example = 25)]
    pub total_items: u64,
}

impl From<PageInfo> for PageInfoDto {
    fn from(info: PageInfo) -> Self {
        Self {
            current_page: info.current_page,
            items_per_page: info.items_per_page,
            last_page: info.last_page,
            total_items: info.total_items,
        }
    }
}
