use crate::database::{CaseStore, StoreError};
use crate::io::{SeedSource, SourceError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { inserted: u64 },
    AlreadySeeded { existing: u64 },
}

/// One-shot loader that fills an empty store from a seed source.
pub struct Seeder {
    store: Arc<dyn CaseStore>,
    source: Box<dyn SeedSource>,
}

impl Seeder {
    pub fn new(store: Arc<dyn CaseStore>, source: Box<dyn SeedSource>) -> Self {
        Self { store, source }
    }

    /// Seeds the store once. A failure leaves the store exactly as it was, so
    /// the run can simply be retried.
    pub async fn run(&self) -> Result<SeedOutcome, SeedError> {
        info!("Seeder: ensuring case_reports schema exists...");
        self.store.ensure_schema_exists().await?;

        // cheap early exit before touching the source
        let existing = self.store.count().await?;
        if existing > 0 {
            info!(existing, "Seeder: store already seeded, nothing to do.");
            return Ok(SeedOutcome::AlreadySeeded { existing });
        }

        let records = self.source.read_records().await?;
        info!(records = records.len(), "Seeder: read seed source, inserting...");

        // the emptiness check is repeated inside the insert transaction
        match self.store.bulk_insert_if_empty(&records).await? {
            Some(inserted) => {
                info!(inserted, "Seeder: success.");
                Ok(SeedOutcome::Seeded { inserted })
            }
            None => {
                let existing = self.store.count().await?;
                info!(existing, "Seeder: another run seeded the store first.");
                Ok(SeedOutcome::AlreadySeeded { existing })
            }
        }
    }
}
