use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AssetRequest, AssetResponse, ListAssetsParams},
    repo_types::AssetFields,
    services,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    pagination::Page,
    state::AppState,
};

pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assets", get(list_assets).post(create_asset))
        .route("/api/assets/:id", put(update_asset).delete(delete_asset))
}

#[instrument(skip(state, params))]
pub async fn list_assets(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<ListAssetsParams>, QueryRejection>,
) -> AppResult<Json<Page<AssetResponse>>> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    services::list_assets(&state, &user, &params).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn create_asset(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AssetRequest>, JsonRejection>,
) -> AppResult<Json<AssetResponse>> {
    let fields = body(payload)?;
    services::create_asset(&state, &user, fields).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn update_asset(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AssetRequest>, JsonRejection>,
) -> AppResult<Json<AssetResponse>> {
    let id = asset_id(id)?;
    let fields = body(payload)?;
    services::update_asset(&state, &user, id, fields).await.map(Json)
}

#[instrument(skip(state))]
pub async fn delete_asset(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<()> {
    let id = asset_id(id)?;
    services::delete_asset(&state, &user, id).await
}

fn body(payload: Result<Json<AssetRequest>, JsonRejection>) -> AppResult<AssetFields> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    req.validate()
}

fn asset_id(id: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|e| AppError::Validation(e.body_text()))
}
