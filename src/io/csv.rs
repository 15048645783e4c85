use crate::domain::NewCaseReport;
use crate::io::{SeedSource, SourceError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

// columns are matched by header, anything else in the file is ignored
#[derive(Deserialize, Debug)]
struct CsvCaseRow {
    date: NaiveDate,
    country: String,
    cases: u64,
    deaths: u64,
}

pub struct CsvSeedSource {
    pub path: PathBuf,
}

impl CsvSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parses `date,country,cases,deaths` CSV text into unsaved reports.
pub fn parse_case_csv(raw: &[u8]) -> Result<Vec<NewCaseReport>, SourceError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(raw);

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<CsvCaseRow>().enumerate() {
        // header is line 1, first data row is line 2
        let fallback_line = index as u64 + 2;
        let row = result.map_err(|e| SourceError::InvalidRecord {
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(fallback_line),
            reason: e.to_string(),
        })?;

        if row.country.is_empty() {
            return Err(SourceError::InvalidRecord {
                line: fallback_line,
                reason: "country is empty".to_string(),
            });
        }

        records.push(NewCaseReport {
            country: row.country,
            cases: row.cases,
            deaths: row.deaths,
            report_date: row.date,
        });
    }

    Ok(records)
}

#[async_trait]
impl SeedSource for CsvSeedSource {
    async fn read_records(&self) -> Result<Vec<NewCaseReport>, SourceError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.clone(),
                source,
            })?;

        parse_case_csv(&raw)
    }
}
