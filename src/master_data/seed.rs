use anyhow::Context;
use tracing::info;

use crate::state::AppState;

pub const SEED_CATEGORIES: [&str; 6] =
    ["Laptop", "Phone", "Bike", "Furniture", "Electronics", "Vehicle"];
pub const SEED_STATUSES: [&str; 4] = ["Active", "Sold", "Discarded", "Under Repair"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_inserted: usize,
    pub statuses_inserted: usize,
}

/// Inserts the fixed reference rows into each table that is still empty.
///
/// The two tables are seeded independently: if statuses fail after
/// categories went in, the categories stay.
pub async fn seed_reference_data(st: &AppState) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    if st.categories.count().await.context("count categories")? == 0 {
        info!("initializing categories");
        for name in SEED_CATEGORIES {
            st.categories
                .insert(name)
                .await
                .with_context(|| format!("insert category {name}"))?;
            report.categories_inserted += 1;
        }
    }

    if st.statuses.count().await.context("count statuses")? == 0 {
        info!("initializing statuses");
        for name in SEED_STATUSES {
            st.statuses
                .insert(name)
                .await
                .with_context(|| format!("insert status {name}"))?;
            report.statuses_inserted += 1;
        }
    }

    info!(?report, "reference data initialization completed");
    Ok(report)
}
