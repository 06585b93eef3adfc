use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentora_core::identity::{IdentityRecord, VerificationStatus};
use rentora_core::repository::{IdentityRepository, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only access to identity uploads owned by the identity service.
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    user_id: Uuid,
    status: String,
    verified: bool,
    verified_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for IdentityRecord {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(IdentityRecord {
            id: row.id,
            user_id: row.user_id,
            status: row.status.parse::<VerificationStatus>().map_err(StoreError::backend)?,
            verified: row.verified,
            verified_at: row.verified_at,
            rejection_reason: row.rejection_reason,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    async fn list_identities(&self, user_id: Uuid) -> StoreResult<Vec<IdentityRecord>> {
        let rows: Vec<IdentityRow> = sqlx::query_as(
            "SELECT id, user_id, status, verified, verified_at, rejection_reason, created_at \
             FROM identities WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter().map(IdentityRecord::try_from).collect()
    }
}
