use async_trait::async_trait;
use rentora_core::repository::{CatalogRepository, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only view of the catalog's `items` table, used to find an item's owner.
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn owner_of_item(&self, item_id: Uuid) -> StoreResult<Option<Uuid>> {
        sqlx::query_scalar("SELECT hoster_id FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}
