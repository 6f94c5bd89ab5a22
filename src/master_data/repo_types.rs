use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AssetCategory {
    pub id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AssetStatus {
    pub id: i64,
    pub status_name: String,
}
