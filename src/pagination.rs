use axum::{
    Json,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Select};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Response header carrying the unpaged result count.
pub const TOTAL_RECORDS_HEADER: &str = "totalamountofrecords";

pub const DEFAULT_RECORDS_PER_PAGE: u64 = 10;

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub records_per_page: Option<u64>,
}

impl PaginationQuery {
    /// Out-of-range values are clamped rather than rejected.
    pub fn normalize(self, max_records_per_page: u64) -> PageRequest {
        let max = max_records_per_page.max(1);
        let per_page = match self.records_per_page {
            None | Some(0) => DEFAULT_RECORDS_PER_PAGE,
            Some(n) => n,
        }
        .min(max);

        PageRequest { page: self.page.unwrap_or(1).max(1), per_page }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

/// SQLite binds OFFSET as a signed 64-bit integer.
const MAX_OFFSET: u64 = i64::MAX as u64;

impl PageRequest {
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page).min(MAX_OFFSET)
    }
}

#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), total: self.total }
    }
}

/// Counts the whole selection, then fetches the requested slice of it.
pub async fn paginate<E, C>(select: Select<E>, page: PageRequest, db: &C) -> AppResult<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let total = select.clone().count(db).await?;
    if page.offset() >= total {
        return Ok(Page { items: Vec::new(), total });
    }
    let items = select.offset(page.offset()).limit(page.per_page).all(db).await?;
    Ok(Page { items, total })
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let mut resp = Json(self.items).into_response();
        resp.headers_mut()
            .insert(HeaderName::from_static(TOTAL_RECORDS_HEADER), HeaderValue::from(self.total));
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<u64>, records_per_page: Option<u64>) -> PaginationQuery {
        PaginationQuery { page, records_per_page }
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(query(None, None).normalize(50), PageRequest { page: 1, per_page: 10 });
        assert_eq!(query(None, Some(0)).normalize(50).per_page, DEFAULT_RECORDS_PER_PAGE);
    }

    #[test]
    fn page_size_is_clamped_to_maximum() {
        assert_eq!(query(Some(2), Some(500)).normalize(50), PageRequest { page: 2, per_page: 50 });
    }

    #[test]
    fn page_zero_is_first_page() {
        let req = query(Some(0), Some(5)).normalize(50);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(query(Some(3), Some(20)).normalize(50).offset(), 40);
    }

    #[test]
    fn huge_page_numbers_keep_offset_bindable() {
        let req = query(Some(u64::MAX), Some(50)).normalize(50);
        assert_eq!(req.offset(), i64::MAX as u64);
        assert_eq!(query(Some(1_000_000_000_000_000_000), Some(50)).normalize(50).offset(), i64::MAX as u64);
    }

    #[test]
    fn response_carries_total_header() {
        let page = Page { items: vec![1, 2], total: 7 };
        let resp = page.into_response();
        assert_eq!(resp.headers().get("totalAmountOfRecords").unwrap(), "7");
    }
}
