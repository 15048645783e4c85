use chrono::NaiveDate;
use derive_more::derive::Display;
use serde::Serialize;

/// One stored report of case and death counts for a country on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[display("{} @ {}", country, report_date)]
pub struct CaseReport {
    pub id: i64,
    pub country: String,
    pub cases: u64,
    pub deaths: u64,
    // chrono serializes NaiveDate as YYYY-MM-DD
    pub report_date: NaiveDate,
}

/// A report that has not been persisted yet (no store-assigned id).
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{} @ {}", country, report_date)]
pub struct NewCaseReport {
    pub country: String,
    pub cases: u64,
    pub deaths: u64,
    pub report_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub total_cases: u64,
    pub total_deaths: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(per_page.max(1));

        Self {
            page,
            per_page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A bounded slice of the ordered reports plus where it sits in the whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedResult {
    #[serde(rename = "data")]
    pub items: Vec<CaseReport>,
    pub pagination: Pagination,
}
