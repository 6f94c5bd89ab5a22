use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{
    dto::{CategoryResponse, StatusResponse},
    services,
};
use crate::{auth::AuthUser, error::AppResult, state::AppState};

pub fn master_data_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/statuses", get(list_statuses))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    services::list_categories(&state).await.map(Json)
}

#[instrument(skip(state))]
pub async fn list_statuses(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<StatusResponse>>> {
    services::list_statuses(&state).await.map(Json)
}
