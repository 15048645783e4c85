use crate::AppState;
use axum::{Json, Router, routing::get};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        message: "Backend is running!",
    })
}
