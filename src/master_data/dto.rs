use serde::Serialize;

use super::repo_types::{AssetCategory, AssetStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: i64,
    pub status_name: String,
}

impl From<AssetCategory> for CategoryResponse {
    fn from(c: AssetCategory) -> Self {
        Self {
            id: c.id,
            category_name: c.category_name,
        }
    }
}

impl From<AssetStatus> for StatusResponse {
    fn from(s: AssetStatus) -> Self {
        Self {
            id: s.id,
            status_name: s.status_name,
        }
    }
}
