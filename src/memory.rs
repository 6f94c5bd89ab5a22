//! In-memory stand-in for the Postgres repositories, used by tests.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::assets::repo::AssetRepository;
use crate::assets::repo_types::{AssetFields, AssetRecord, AssetSortField};
use crate::auth::repo::UserRepository;
use crate::auth::repo_types::{NewUser, User};
use crate::master_data::repo::{CategoryRepository, StatusRepository};
use crate::master_data::repo_types::{AssetCategory, AssetStatus};
use crate::pagination::{PageRequest, SortDirection};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

/// Per-table id sequence, like a `BIGSERIAL` column.
#[derive(Default)]
struct Seq(i64);

impl Seq {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
struct Tables {
    user_ids: Seq,
    category_ids: Seq,
    status_ids: Seq,
    asset_ids: Seq,
    users: Vec<User>,
    categories: Vec<AssetCategory>,
    statuses: Vec<AssetStatus>,
    assets: Vec<StoredAsset>,
}

#[derive(Clone)]
struct StoredAsset {
    id: i64,
    user_id: i64,
    fields: AssetFields,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl Tables {
    fn record(&self, a: &StoredAsset) -> anyhow::Result<AssetRecord> {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == a.fields.category_id)
            .ok_or_else(|| anyhow::anyhow!("dangling category {}", a.fields.category_id))?;
        let status = self
            .statuses
            .iter()
            .find(|s| s.id == a.fields.status_id)
            .ok_or_else(|| anyhow::anyhow!("dangling status {}", a.fields.status_id))?;
        Ok(AssetRecord {
            id: a.id,
            user_id: a.user_id,
            asset_name: a.fields.asset_name.clone(),
            category_id: category.id,
            category_name: category.category_name.clone(),
            status_id: status.id,
            status_name: status.status_name.clone(),
            purchase_date: a.fields.purchase_date,
            warranty_expiry_date: a.fields.warranty_expiry_date,
            asset_image_url: a.fields.asset_image_url.clone(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        })
    }

    fn check_references(&self, fields: &AssetFields) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.categories.iter().any(|c| c.id == fields.category_id),
            "foreign key violation: category {}",
            fields.category_id
        );
        anyhow::ensure!(
            self.statuses.iter().any(|s| s.id == fields.status_id),
            "foreign key violation: status {}",
            fields.status_id
        );
        Ok(())
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }
}

/// Postgres ordering: NULLs sort after every value when ascending.
fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn compare(a: &AssetRecord, b: &AssetRecord, field: AssetSortField) -> Ordering {
    match field {
        AssetSortField::Id => a.id.cmp(&b.id),
        AssetSortField::AssetName => a.asset_name.cmp(&b.asset_name),
        AssetSortField::CategoryId => a.category_id.cmp(&b.category_id),
        AssetSortField::StatusId => a.status_id.cmp(&b.status_id),
        AssetSortField::PurchaseDate => a.purchase_date.cmp(&b.purchase_date),
        AssetSortField::WarrantyExpiryDate => {
            nulls_last(&a.warranty_expiry_date, &b.warranty_expiry_date)
        }
        AssetSortField::AssetImageUrl => nulls_last(&a.asset_image_url, &b.asset_image_url),
        AssetSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        AssetSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.lock().users.iter().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.lock().users.iter().any(|u| u.email == email))
    }

    async fn create(&self, user: NewUser<'_>) -> anyhow::Result<User> {
        let mut t = self.lock();
        anyhow::ensure!(
            !t.users.iter().any(|u| u.username == user.username || u.email == user.email),
            "unique violation on users"
        );
        let now = OffsetDateTime::now_utc();
        let row = User {
            id: t.user_ids.next(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            password_hash: user.password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.users.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_all(&self) -> anyhow::Result<Vec<AssetCategory>> {
        Ok(self.lock().categories.clone())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetCategory>> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.lock().categories.len() as i64)
    }

    async fn insert(&self, name: &str) -> anyhow::Result<AssetCategory> {
        let mut t = self.lock();
        anyhow::ensure!(
            !t.categories.iter().any(|c| c.category_name == name),
            "unique violation on category {name}"
        );
        let row = AssetCategory { id: t.category_ids.next(), category_name: name.to_string() };
        t.categories.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl StatusRepository for MemoryStore {
    async fn find_all(&self) -> anyhow::Result<Vec<AssetStatus>> {
        Ok(self.lock().statuses.clone())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetStatus>> {
        Ok(self.lock().statuses.iter().find(|s| s.id == id).cloned())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.lock().statuses.len() as i64)
    }

    async fn insert(&self, name: &str) -> anyhow::Result<AssetStatus> {
        let mut t = self.lock();
        anyhow::ensure!(
            !t.statuses.iter().any(|s| s.status_name == name),
            "unique violation on status {name}"
        );
        let row = AssetStatus { id: t.status_ids.next(), status_name: name.to_string() };
        t.statuses.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AssetRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<AssetRecord>> {
        let t = self.lock();
        t.assets.iter().find(|a| a.id == id).map(|a| t.record(a)).transpose()
    }

    async fn find_page_by_owner(
        &self,
        owner_id: i64,
        search: Option<&str>,
        req: &PageRequest<AssetSortField>,
    ) -> anyhow::Result<(Vec<AssetRecord>, i64)> {
        let t = self.lock();
        let needle = search.map(str::to_lowercase);
        let mut rows = t
            .assets
            .iter()
            .filter(|a| a.user_id == owner_id)
            .filter(|a| match &needle {
                Some(n) => a.fields.asset_name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .map(|a| t.record(a))
            .collect::<anyhow::Result<Vec<_>>>()?;

        rows.sort_by(|a, b| {
            let ord = compare(a, b, req.sort);
            let ord = match req.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            ord.then(a.id.cmp(&b.id))
        });

        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(req.offset() as usize)
            .take(req.size as usize)
            .collect();
        Ok((page, total))
    }

    async fn insert(&self, owner_id: i64, fields: &AssetFields) -> anyhow::Result<AssetRecord> {
        let mut t = self.lock();
        t.check_references(fields)?;
        let now = OffsetDateTime::now_utc();
        let stored = StoredAsset {
            id: t.asset_ids.next(),
            user_id: owner_id,
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
        };
        let record = t.record(&stored)?;
        t.assets.push(stored);
        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        fields: &AssetFields,
    ) -> anyhow::Result<Option<AssetRecord>> {
        let mut t = self.lock();
        t.check_references(fields)?;
        let Some(idx) = t.assets.iter().position(|a| a.id == id && a.user_id == owner_id) else {
            return Ok(None);
        };
        let asset = &mut t.assets[idx];
        asset.fields = fields.clone();
        // strictly later than the previous write, at Postgres timestamp resolution
        asset.updated_at =
            OffsetDateTime::now_utc().max(asset.updated_at + Duration::microseconds(1));
        let snapshot = asset.clone();
        t.record(&snapshot).map(Some)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.assets.len();
        t.assets.retain(|a| !(a.id == id && a.user_id == owner_id));
        Ok(t.assets.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn fields(category_id: i64, status_id: i64) -> AssetFields {
        AssetFields {
            asset_name: "Laptop".into(),
            category_id,
            status_id,
            purchase_date: date!(2023 - 01 - 15),
            warranty_expiry_date: None,
            asset_image_url: None,
        }
    }

    #[tokio::test]
    async fn each_table_numbers_its_rows_from_one() {
        let store = MemoryStore::default();
        let user = UserRepository::create(
            &store,
            NewUser { username: "alice", email: "a@example.com", password_hash: "x" },
        )
        .await
        .unwrap();
        let c1 = CategoryRepository::insert(&store, "Laptop").await.unwrap();
        let c2 = CategoryRepository::insert(&store, "Phone").await.unwrap();
        let s1 = StatusRepository::insert(&store, "Active").await.unwrap();
        assert_eq!((user.id, c1.id, c2.id, s1.id), (1, 1, 2, 1));

        let a1 = AssetRepository::insert(&store, user.id, &fields(2, 1)).await.unwrap();
        assert_eq!(a1.id, 1);
        assert_eq!(a1.category_name, "Phone");
        assert_eq!(a1.status_name, "Active");
    }

    #[tokio::test]
    async fn deleted_asset_ids_are_not_reused() {
        let store = MemoryStore::default();
        CategoryRepository::insert(&store, "Laptop").await.unwrap();
        StatusRepository::insert(&store, "Active").await.unwrap();

        let first = AssetRepository::insert(&store, 1, &fields(1, 1)).await.unwrap();
        assert!(AssetRepository::delete(&store, first.id, 1).await.unwrap());
        let second = AssetRepository::insert(&store, 1, &fields(1, 1)).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }
}
