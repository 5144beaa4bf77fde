//! HTTP handlers

pub mod error;
pub mod movies;
pub mod ratings;

use std::str::FromStr;

use marquee_domain::search::{PageRequest, Sort};

use crate::dto::ListQuery;
use error::{ApiError, ApiResult};

/// Page and sort of a list request, with the configured page size as default
fn list_params<F>(query: &ListQuery, default_page_size: u32) -> ApiResult<(PageRequest, Sort<F>)>
where
    F: FromStr<Err = String>,
{
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(default_page_size as i64),
    )?;
    let sort = Sort::parse(
        query.sort_by.as_deref().unwrap_or_default(),
        query.sort_order.as_deref().unwrap_or_default(),
    )
    .map_err(ApiError::bad_request)?;

    Ok((page, sort))
}
