use tracing::debug;

use super::dto::{CategoryResponse, StatusResponse};
use crate::{error::AppResult, state::AppState};

pub async fn list_categories(st: &AppState) -> AppResult<Vec<CategoryResponse>> {
    let rows = st.categories.find_all().await?;
    debug!(count = rows.len(), "categories fetched");
    Ok(rows.into_iter().map(CategoryResponse::from).collect())
}

pub async fn list_statuses(st: &AppState) -> AppResult<Vec<StatusResponse>> {
    let rows = st.statuses.find_all().await?;
    debug!(count = rows.len(), "statuses fetched");
    Ok(rows.into_iter().map(StatusResponse::from).collect())
}
