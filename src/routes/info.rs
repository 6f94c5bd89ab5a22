use axum::{routing::get, Json, Router};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

pub fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/api/test", get(test))
        .route("/api", get(root))
        .route("/api/", get(root))
}

pub async fn test() -> Json<TestResponse> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(TestResponse {
        message: "Backend is working!",
        timestamp,
        status: "success",
    })
}

pub async fn root() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Personal Asset Management API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}
