pub mod case_report;

pub use case_report::{CaseReport, CountrySummary, NewCaseReport, PagedResult, Pagination};
