use tracing::{info, warn};

use super::{
    dto::{AssetResponse, ListAssetsParams},
    repo_types::{AssetFields, AssetRecord},
};
use crate::{
    auth::AuthUser,
    error::{db_error_code, AppError, AppResult, FOREIGN_KEY_VIOLATION},
    pagination::Page,
    state::AppState,
};

pub async fn list_assets(
    st: &AppState,
    caller: &AuthUser,
    params: &ListAssetsParams,
) -> AppResult<Page<AssetResponse>> {
    let req = params.page_request()?;
    let (rows, total) = st
        .assets
        .find_page_by_owner(caller.id, params.search_term(), &req)
        .await?;
    info!(user_id = caller.id, total, page = req.page, "assets listed");
    Ok(Page::new(rows, total, &req).map(AssetResponse::from))
}

pub async fn create_asset(
    st: &AppState,
    caller: &AuthUser,
    fields: AssetFields,
) -> AppResult<AssetResponse> {
    ensure_references(st, &fields).await?;
    let record = st
        .assets
        .insert(caller.id, &fields)
        .await
        .map_err(reference_violation)?;
    info!(user_id = caller.id, asset_id = record.id, "asset created");
    Ok(record.into())
}

pub async fn update_asset(
    st: &AppState,
    caller: &AuthUser,
    asset_id: i64,
    fields: AssetFields,
) -> AppResult<AssetResponse> {
    owned_asset(st, caller, asset_id).await?;
    ensure_references(st, &fields).await?;
    let record = st
        .assets
        .update(asset_id, caller.id, &fields)
        .await
        .map_err(reference_violation)?
        .ok_or_else(|| AppError::NotFound(format!("asset {asset_id}")))?;
    info!(user_id = caller.id, asset_id, "asset updated");
    Ok(record.into())
}

pub async fn delete_asset(st: &AppState, caller: &AuthUser, asset_id: i64) -> AppResult<()> {
    owned_asset(st, caller, asset_id).await?;
    if !st.assets.delete(asset_id, caller.id).await? {
        return Err(AppError::NotFound(format!("asset {asset_id}")));
    }
    info!(user_id = caller.id, asset_id, "asset deleted");
    Ok(())
}

/// Loads the asset and checks it belongs to the caller.
async fn owned_asset(st: &AppState, caller: &AuthUser, asset_id: i64) -> AppResult<AssetRecord> {
    let asset = st
        .assets
        .find_by_id(asset_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("asset {asset_id}")))?;
    if asset.user_id != caller.id {
        warn!(user_id = caller.id, asset_id, owner_id = asset.user_id, "foreign asset access");
        return Err(AppError::Forbidden(format!(
            "asset {asset_id} belongs to a different user"
        )));
    }
    Ok(asset)
}

async fn ensure_references(st: &AppState, fields: &AssetFields) -> AppResult<()> {
    if st.categories.find_by_id(fields.category_id).await?.is_none() {
        return Err(AppError::NotFound(format!("category {}", fields.category_id)));
    }
    if st.statuses.find_by_id(fields.status_id).await?.is_none() {
        return Err(AppError::NotFound(format!("status {}", fields.status_id)));
    }
    Ok(())
}

fn reference_violation(err: anyhow::Error) -> AppError {
    match db_error_code(&err).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => AppError::NotFound("referenced category or status".into()),
        _ => AppError::Unexpected(err),
    }
}
