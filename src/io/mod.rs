use crate::domain::NewCaseReport;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub mod csv;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read seed source {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
}

/// Where seed data comes from. Implementations read the whole source up front
/// so a bad row is found before anything is written.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn read_records(&self) -> Result<Vec<NewCaseReport>, SourceError>;
}
