use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{AssetFields, AssetRecord, AssetSortField};
use crate::pagination::PageRequest;

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetRecord>>;

    /// One page of the owner's assets plus the total number matching.
    async fn find_page_by_owner(
        &self,
        owner_id: i64,
        search: Option<&str>,
        req: &PageRequest<AssetSortField>,
    ) -> anyhow::Result<(Vec<AssetRecord>, i64)>;

    async fn insert(&self, owner_id: i64, fields: &AssetFields) -> anyhow::Result<AssetRecord>;

    /// Overwrites every mutable field and bumps `updated_at`. `None` when no
    /// row with that id belongs to the owner.
    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        fields: &AssetFields,
    ) -> anyhow::Result<Option<AssetRecord>>;

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgAssetRepository {
    db: PgPool,
}

impl PgAssetRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn joined_select(source: &str) -> String {
    format!(
        r#"
        SELECT a.id, a.user_id, a.asset_name,
               a.category_id, c.category_name,
               a.status_id, s.status_name,
               a.purchase_date, a.warranty_expiry_date, a.asset_image_url,
               a.created_at, a.updated_at
          FROM {source} a
          JOIN asset_categories c ON c.id = a.category_id
          JOIN asset_statuses s ON s.id = a.status_id
        "#
    )
}

const OWNER_FILTER: &str =
    "a.user_id = $1 AND ($2::text IS NULL OR strpos(lower(a.asset_name), lower($2)) > 0)";

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetRecord>> {
        let sql = format!("{} WHERE a.id = $1", joined_select("assets"));
        let row = sqlx::query_as::<_, AssetRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find asset by id")?;
        Ok(row)
    }

    async fn find_page_by_owner(
        &self,
        owner_id: i64,
        search: Option<&str>,
        req: &PageRequest<AssetSortField>,
    ) -> anyhow::Result<(Vec<AssetRecord>, i64)> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .context("set read only")?;

        let count_sql = format!("SELECT COUNT(*) FROM assets a WHERE {OWNER_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner_id)
            .bind(search)
            .fetch_one(&mut *tx)
            .await
            .context("count assets by owner")?;

        // the sort column comes from a closed enum, never from the request
        let page_sql = format!(
            "{} WHERE {OWNER_FILTER} ORDER BY {} {}, a.id ASC LIMIT $3 OFFSET $4",
            joined_select("assets"),
            req.sort.column(),
            req.direction.as_sql(),
        );
        let rows = sqlx::query_as::<_, AssetRecord>(&page_sql)
            .bind(owner_id)
            .bind(search)
            .bind(req.size)
            .bind(req.offset())
            .fetch_all(&mut *tx)
            .await
            .context("list assets by owner")?;

        tx.commit().await.context("commit tx")?;
        Ok((rows, total))
    }

    async fn insert(&self, owner_id: i64, fields: &AssetFields) -> anyhow::Result<AssetRecord> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO assets (user_id, asset_name, category_id, status_id,
                                    purchase_date, warranty_expiry_date, asset_image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            {}
            "#,
            joined_select("inserted")
        );
        let row = sqlx::query_as::<_, AssetRecord>(&sql)
            .bind(owner_id)
            .bind(fields.asset_name.as_str())
            .bind(fields.category_id)
            .bind(fields.status_id)
            .bind(fields.purchase_date)
            .bind(fields.warranty_expiry_date)
            .bind(fields.asset_image_url.as_deref())
            .fetch_one(&self.db)
            .await
            .context("insert asset")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        fields: &AssetFields,
    ) -> anyhow::Result<Option<AssetRecord>> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE assets
                   SET asset_name = $3,
                       category_id = $4,
                       status_id = $5,
                       purchase_date = $6,
                       warranty_expiry_date = $7,
                       asset_image_url = $8,
                       updated_at = now()
                 WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            {}
            "#,
            joined_select("updated")
        );
        let row = sqlx::query_as::<_, AssetRecord>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(fields.asset_name.as_str())
            .bind(fields.category_id)
            .bind(fields.status_id)
            .bind(fields.purchase_date)
            .bind(fields.warranty_expiry_date)
            .bind(fields.asset_image_url.as_deref())
            .fetch_optional(&self.db)
            .await
            .context("update asset")?;
        Ok(row)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM assets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await
            .context("delete asset")?;
        Ok(res.rows_affected() > 0)
    }
}
