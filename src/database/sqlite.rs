use crate::database::model::{DbCaseReport, DbCountrySummary};
use crate::database::{CaseFilter, CaseOrder, CasePage, CaseStore, StoreError};
use crate::domain::{CaseReport, CountrySummary, NewCaseReport};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnection, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::time::Duration;
use tracing::{debug, info};

// 4 binds per row, keeps each statement under SQLite's legacy 999 parameter cap
const INSERT_CHUNK_ROWS: usize = 200;

pub struct SqliteCaseStore {
    pool: Pool<Sqlite>,
}

struct InsertRow<'a> {
    country: &'a str,
    cases: i64,
    deaths: i64,
    report_date: NaiveDate,
}

impl SqliteCaseStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`, creating the database file first
    /// if it does not exist yet.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(database_url)
            .await
            .unwrap_or(false)
        {
            info!(database_url, "database not found, creating");
            Sqlite::create_database(database_url)
                .await
                .map_err(StoreError::Unavailable)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(StoreError::Unavailable)?;

        Ok(Self::new(pool))
    }
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a CaseFilter) {
    // instr is case sensitive and, unlike LIKE, has no wildcard characters
    if let Some(needle) = filter.country_contains.as_deref() {
        builder
            .push(" WHERE instr(country, ")
            .push_bind(needle)
            .push(") > 0");
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn validate(records: &[NewCaseReport]) -> Result<Vec<InsertRow<'_>>, StoreError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            if record.country.trim().is_empty() {
                return Err(StoreError::InvalidRecord {
                    index,
                    reason: format!("country is empty ({})", record),
                });
            }

            let cases = i64::try_from(record.cases).map_err(|_| StoreError::InvalidRecord {
                index,
                reason: format!("cases out of range for {}: {}", record, record.cases),
            })?;
            let deaths = i64::try_from(record.deaths).map_err(|_| StoreError::InvalidRecord {
                index,
                reason: format!("deaths out of range for {}: {}", record, record.deaths),
            })?;

            Ok(InsertRow {
                country: &record.country,
                cases,
                deaths,
                report_date: record.report_date,
            })
        })
        .collect()
}

async fn count_rows(conn: &mut SqliteConnection) -> Result<u64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM case_reports")
        .fetch_one(conn)
        .await?;

    Ok(count.max(0) as u64)
}

async fn insert_rows(conn: &mut SqliteConnection, rows: &[InsertRow<'_>]) -> Result<u64, StoreError> {
    let mut inserted = 0;

    for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("INSERT INTO case_reports (country, cases, deaths, report_date) ");
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.country)
                .push_bind(row.cases)
                .push_bind(row.deaths)
                .push_bind(row.report_date);
        });

        inserted += builder.build().execute(&mut *conn).await?.rows_affected();
    }

    Ok(inserted)
}

#[async_trait]
impl CaseStore for SqliteCaseStore {
    async fn ensure_schema_exists(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn list_distinct_countries(&self) -> Result<Vec<String>, StoreError> {
        let countries = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT country FROM case_reports ORDER BY country ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }

    async fn query_reports(
        &self,
        filter: &CaseFilter,
        order: CaseOrder,
        offset: u64,
        limit: u64,
    ) -> Result<CasePage, StoreError> {
        // count and page must describe the same snapshot
        let mut tx = self.pool.begin().await?;

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM case_reports");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await?;

        let mut page_query = QueryBuilder::<Sqlite>::new(
            "SELECT id, country, cases, deaths, report_date FROM case_reports",
        );
        push_filter(&mut page_query, filter);
        page_query
            .push(" ORDER BY ")
            .push(order.as_sql())
            .push(" LIMIT ")
            .push_bind(to_sql_int(limit))
            .push(" OFFSET ")
            .push_bind(to_sql_int(offset));

        let rows = page_query
            .build_query_as::<DbCaseReport>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let items = rows
            .into_iter()
            .map(CaseReport::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(total, returned = items.len(), offset, limit, "queried case reports");

        Ok(CasePage {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn summarize_by_country(&self, limit: u32) -> Result<Vec<CountrySummary>, StoreError> {
        let rows = sqlx::query_as::<_, DbCountrySummary>(
            r#"
            SELECT
                country,
                MAX(cases) AS total_cases,
                MAX(deaths) AS total_deaths
            FROM case_reports
            GROUP BY country
            ORDER BY total_cases DESC, country ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CountrySummary::try_from).collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        count_rows(&mut conn).await
    }

    async fn bulk_insert(&self, records: &[NewCaseReport]) -> Result<u64, StoreError> {
        let rows = validate(records)?;

        let mut tx = self.pool.begin().await?;
        let inserted = insert_rows(&mut tx, &rows).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    async fn bulk_insert_if_empty(
        &self,
        records: &[NewCaseReport],
    ) -> Result<Option<u64>, StoreError> {
        let rows = validate(records)?;

        // dropping the transaction without commit rolls it back
        let mut tx = self.pool.begin().await?;
        if count_rows(&mut tx).await? > 0 {
            return Ok(None);
        }
        let inserted = insert_rows(&mut tx, &rows).await?;
        tx.commit().await?;

        Ok(Some(inserted))
    }
}
