use crate::AppState;
use crate::domain::{CountrySummary, PagedResult};
use crate::features::error::ApiError;
use crate::services::PageRequest;
use crate::services::aggregation::DEFAULT_SUMMARY_LIMIT;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

// everything arrives as text so a bad number falls back to its default
// instead of being rejected by the extractor
#[derive(Deserialize, Debug, Default)]
pub struct DataParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub country: Option<String>,
}

pub fn cases_router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries_handler))
        .route("/data", get(list_data_handler))
        .route("/summary/by-country", get(summary_by_country_handler))
}

async fn list_countries_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let countries = state.query_service.list_countries().await?;
    Ok(Json(countries))
}

async fn list_data_handler(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Result<Json<PagedResult>, ApiError> {
    let request = PageRequest::from_raw(
        params.page.as_deref(),
        params.per_page.as_deref(),
        params.country.as_deref(),
    );

    let page = state.query_service.fetch_page(&request).await?;
    Ok(Json(page))
}

async fn summary_by_country_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountrySummary>>, ApiError> {
    let summary = state
        .aggregation_service
        .top_countries_by_severity(DEFAULT_SUMMARY_LIMIT)
        .await?;

    Ok(Json(summary))
}
