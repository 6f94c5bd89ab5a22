use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{AssetCategory, AssetStatus};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<AssetCategory>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetCategory>>;
    async fn count(&self) -> anyhow::Result<i64>;
    async fn insert(&self, name: &str) -> anyhow::Result<AssetCategory>;
}

#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<AssetStatus>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetStatus>>;
    async fn count(&self) -> anyhow::Result<i64>;
    async fn insert(&self, name: &str) -> anyhow::Result<AssetStatus>;
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    db: PgPool,
}

impl PgCategoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<AssetCategory>> {
        let rows = sqlx::query_as::<_, AssetCategory>(
            "SELECT id, category_name FROM asset_categories ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetCategory>> {
        let row = sqlx::query_as::<_, AssetCategory>(
            "SELECT id, category_name FROM asset_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM asset_categories")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }

    async fn insert(&self, name: &str) -> anyhow::Result<AssetCategory> {
        let row = sqlx::query_as::<_, AssetCategory>(
            "INSERT INTO asset_categories (category_name) VALUES ($1) RETURNING id, category_name",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}

#[derive(Clone)]
pub struct PgStatusRepository {
    db: PgPool,
}

impl PgStatusRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<AssetStatus>> {
        let rows = sqlx::query_as::<_, AssetStatus>(
            "SELECT id, status_name FROM asset_statuses ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetStatus>> {
        let row = sqlx::query_as::<_, AssetStatus>(
            "SELECT id, status_name FROM asset_statuses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM asset_statuses")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }

    async fn insert(&self, name: &str) -> anyhow::Result<AssetStatus> {
        let row = sqlx::query_as::<_, AssetStatus>(
            "INSERT INTO asset_statuses (status_name) VALUES ($1) RETURNING id, status_name",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
