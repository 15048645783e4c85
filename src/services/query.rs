use crate::database::{CaseFilter, CaseOrder, CaseStore, StoreError};
use crate::domain::{PagedResult, Pagination};
use std::num::IntErrorKind;
use std::sync::Arc;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Parse-with-fallback for paging parameters. Missing, unparseable, zero and
/// negative values all yield `default` instead of an error. Positive integers
/// too large for `u64` saturate rather than falling back.
pub fn parse_positive_or(raw: Option<&str>, default: u64) -> u64 {
    let parsed = raw.and_then(|value| match value.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    });

    parsed.filter(|value| *value >= 1).unwrap_or(default)
}

/// Validated paging request. Build it from raw query values with
/// [`PageRequest::from_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
    pub country: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            country: None,
        }
    }
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, per_page: Option<&str>, country: Option<&str>) -> Self {
        Self {
            page: parse_positive_or(page, DEFAULT_PAGE),
            per_page: parse_positive_or(per_page, DEFAULT_PER_PAGE),
            // an empty filter means no restriction
            country: country.filter(|c| !c.is_empty()).map(str::to_owned),
        }
    }
}

pub struct QueryService {
    store: Arc<dyn CaseStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    /// Returns one page of reports, most recent first. A page past the end is
    /// an empty page with consistent metadata, not an error.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<PagedResult, StoreError> {
        let page = request.page.max(1);
        let per_page = request.per_page.max(1);

        let filter = CaseFilter {
            country_contains: request.country.clone().filter(|c| !c.is_empty()),
        };
        // the store clamps both to its integer range
        let offset = (page - 1).saturating_mul(per_page);

        let result = self
            .store
            .query_reports(&filter, CaseOrder::ReportDateDesc, offset, per_page)
            .await?;

        Ok(PagedResult {
            items: result.items,
            pagination: Pagination::new(page, per_page, result.total),
        })
    }

    pub async fn list_countries(&self) -> Result<Vec<String>, StoreError> {
        self.store.list_distinct_countries().await
    }
}
