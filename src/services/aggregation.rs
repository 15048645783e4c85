use crate::database::{CaseStore, StoreError};
use crate::domain::CountrySummary;
use std::sync::Arc;

pub const DEFAULT_SUMMARY_LIMIT: u32 = 10;

pub struct AggregationService {
    store: Arc<dyn CaseStore>,
}

impl AggregationService {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    /// Countries ranked by their highest reported case count.
    ///
    /// Reports are cumulative snapshots, so each country's totals are the
    /// maximum observed `cases` and `deaths`, never a sum. Ties on cases are
    /// ordered by country name ascending.
    pub async fn top_countries_by_severity(
        &self,
        limit: u32,
    ) -> Result<Vec<CountrySummary>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.store.summarize_by_country(limit).await
    }
}
