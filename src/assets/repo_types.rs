use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Asset row joined with its category and status names.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AssetRecord {
    pub id: i64,
    pub user_id: i64,
    pub asset_name: String,
    pub category_id: i64,
    pub category_name: String,
    pub status_id: i64,
    pub status_name: String,
    pub purchase_date: Date,
    pub warranty_expiry_date: Option<Date>,
    pub asset_image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated mutable fields of an asset, written as a whole on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFields {
    pub asset_name: String,
    pub category_id: i64,
    pub status_id: i64,
    pub purchase_date: Date,
    pub warranty_expiry_date: Option<Date>,
    pub asset_image_url: Option<String>,
}

/// Attributes an asset listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSortField {
    Id,
    AssetName,
    CategoryId,
    StatusId,
    PurchaseDate,
    WarrantyExpiryDate,
    AssetImageUrl,
    CreatedAt,
    UpdatedAt,
}

impl AssetSortField {
    /// Accepts the attribute names used on the wire.
    pub fn parse(raw: &str) -> Option<Self> {
        let field = match raw {
            "id" => Self::Id,
            "assetName" => Self::AssetName,
            "categoryId" => Self::CategoryId,
            "statusId" => Self::StatusId,
            "purchaseDate" => Self::PurchaseDate,
            "warrantyExpiryDate" => Self::WarrantyExpiryDate,
            "assetImageUrl" => Self::AssetImageUrl,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "a.id",
            Self::AssetName => "a.asset_name",
            Self::CategoryId => "a.category_id",
            Self::StatusId => "a.status_id",
            Self::PurchaseDate => "a.purchase_date",
            Self::WarrantyExpiryDate => "a.warranty_expiry_date",
            Self::AssetImageUrl => "a.asset_image_url",
            Self::CreatedAt => "a.created_at",
            Self::UpdatedAt => "a.updated_at",
        }
    }
}
