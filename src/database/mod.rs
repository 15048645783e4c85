use crate::domain::{CaseReport, CountrySummary, NewCaseReport};
use async_trait::async_trait;
use thiserror::Error;

pub mod model;
pub mod sqlite;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("case store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("failed to ensure schema: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt row in case store: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // transport and pool failures mean we never reached the data
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
            other => StoreError::Database(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    /// Case-sensitive substring the country name must contain.
    pub country_contains: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseOrder {
    #[default]
    ReportDateDesc,
    ReportDateAsc,
}

impl CaseOrder {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            CaseOrder::ReportDateDesc => "report_date DESC, id DESC",
            CaseOrder::ReportDateAsc => "report_date ASC, id ASC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePage {
    pub items: Vec<CaseReport>,
    pub total: u64,
}

// a case store can be shared between request handlers, sqlx::Pool is thread safe
// generic contract here, engine specific implementation in "sqlite.rs"
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Creates the underlying table if missing, no-op otherwise.
    async fn ensure_schema_exists(&self) -> Result<(), StoreError>;

    async fn list_distinct_countries(&self) -> Result<Vec<String>, StoreError>;

    async fn query_reports(
        &self,
        filter: &CaseFilter,
        order: CaseOrder,
        offset: u64,
        limit: u64,
    ) -> Result<CasePage, StoreError>;

    /// Max cases and max deaths per country, ordered by cases descending then
    /// country ascending.
    async fn summarize_by_country(&self, limit: u32) -> Result<Vec<CountrySummary>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    // write operations

    /// Inserts every record in one transaction or none of them.
    async fn bulk_insert(&self, records: &[NewCaseReport]) -> Result<u64, StoreError>;

    /// Like `bulk_insert`, but only when the store holds no reports at the time
    /// the transaction writes. Returns `None` when rows already exist.
    async fn bulk_insert_if_empty(
        &self,
        records: &[NewCaseReport],
    ) -> Result<Option<u64>, StoreError>;
}
