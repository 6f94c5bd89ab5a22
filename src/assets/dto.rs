use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo_types::{AssetFields, AssetRecord, AssetSortField};
use crate::{
    error::{AppError, AppResult},
    master_data::dto::{CategoryResponse, StatusResponse},
    pagination::{PageRequest, SortDirection},
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Body of `POST /api/assets` and `PUT /api/assets/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    pub asset_name: Option<String>,
    pub category_id: Option<i64>,
    pub status_id: Option<i64>,
    #[serde(default, with = "iso_date::option")]
    pub purchase_date: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub warranty_expiry_date: Option<Date>,
    pub asset_image_url: Option<String>,
}

impl AssetRequest {
    pub fn validate(self) -> AppResult<AssetFields> {
        let asset_name = self
            .asset_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("asset name is required".into()))?;
        let category_id = self
            .category_id
            .ok_or_else(|| AppError::Validation("category id is required".into()))?;
        let status_id = self
            .status_id
            .ok_or_else(|| AppError::Validation("status id is required".into()))?;
        let purchase_date = self
            .purchase_date
            .ok_or_else(|| AppError::Validation("purchase date is required".into()))?;

        Ok(AssetFields {
            asset_name,
            category_id,
            status_id,
            purchase_date,
            warranty_expiry_date: self.warranty_expiry_date,
            asset_image_url: self
                .asset_image_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: i64,
    pub user_id: i64,
    pub asset_name: String,
    pub category_id: i64,
    pub status_id: i64,
    #[serde(with = "iso_date")]
    pub purchase_date: Date,
    #[serde(with = "iso_date::option")]
    pub warranty_expiry_date: Option<Date>,
    pub asset_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub category: CategoryResponse,
    pub status: StatusResponse,
}

impl From<AssetRecord> for AssetResponse {
    fn from(r: AssetRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            asset_name: r.asset_name,
            category_id: r.category_id,
            status_id: r.status_id,
            purchase_date: r.purchase_date,
            warranty_expiry_date: r.warranty_expiry_date,
            asset_image_url: r.asset_image_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
            category: CategoryResponse {
                id: r.category_id,
                category_name: r.category_name,
            },
            status: StatusResponse {
                id: r.status_id,
                status_name: r.status_name,
            },
        }
    }
}

/// Query string of `GET /api/assets`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssetsParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub search: Option<String>,
}

impl ListAssetsParams {
    pub fn page_request(&self) -> AppResult<PageRequest<AssetSortField>> {
        let page = self.page.unwrap_or(0);
        if page < 0 {
            return Err(AppError::Validation("page must not be negative".into()));
        }
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(AppError::Validation(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if page.checked_mul(size).is_none() {
            return Err(AppError::Validation(format!("page {page} is out of range")));
        }
        let sort_by = self.sort_by.as_deref().unwrap_or("createdAt");
        let sort = AssetSortField::parse(sort_by)
            .ok_or_else(|| AppError::Validation(format!("cannot sort by {sort_by}")))?;
        let direction = self
            .sort_dir
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or(SortDirection::Desc);
        Ok(PageRequest { page, size, sort, direction })
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
