use crate::database::StoreError;
use crate::domain::{CaseReport, CountrySummary};
use chrono::NaiveDate;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct DbCaseReport {
    pub id: i64,
    pub country: String,
    pub cases: i64,
    pub deaths: i64,
    pub report_date: NaiveDate,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct DbCountrySummary {
    pub country: String,
    pub total_cases: i64,
    pub total_deaths: i64,
}

fn non_negative(value: i64, column: &str, id: &dyn std::fmt::Display) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("negative {} ({}) for {}", column, value, id)))
}

impl TryFrom<DbCaseReport> for CaseReport {
    type Error = StoreError;

    fn try_from(row: DbCaseReport) -> Result<Self, Self::Error> {
        let id = format!("report {}", row.id);
        Ok(CaseReport {
            id: row.id,
            cases: non_negative(row.cases, "cases", &id)?,
            deaths: non_negative(row.deaths, "deaths", &id)?,
            country: row.country,
            report_date: row.report_date,
        })
    }
}

impl TryFrom<DbCountrySummary> for CountrySummary {
    type Error = StoreError;

    fn try_from(row: DbCountrySummary) -> Result<Self, Self::Error> {
        Ok(CountrySummary {
            total_cases: non_negative(row.total_cases, "total_cases", &row.country)?,
            total_deaths: non_negative(row.total_deaths, "total_deaths", &row.country)?,
            country: row.country,
        })
    }
}
