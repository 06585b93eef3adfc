use async_trait::async_trait;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::identity::IdentityRecord;
use crate::models::{Booking, BookingItem, BookingStatus, CustomerInfo, CustomerSnapshot};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Raised inside the reservation transaction when the renter has no
    /// identity record at all.
    #[error("renter has no identity record")]
    IdentityMissing,

    #[error("storage backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::Backend(err.into())
    }
}

/// Header, line items and contact snapshot written and read as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking: Booking,
    pub items: Vec<BookingItem>,
    pub customer: CustomerSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListing {
    pub booking: Booking,
    pub item_count: i64,
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist header, items and snapshot in a single transaction. Fails with
    /// `StoreError::IdentityMissing` (and writes nothing) when the renter has
    /// no identity record.
    async fn create_booking(&self, record: &BookingRecord) -> StoreResult<()>;

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    async fn get_booking_record(&self, id: Uuid) -> StoreResult<Option<BookingRecord>>;

    async fn list_for_renter(&self, user_id: Uuid) -> StoreResult<Vec<BookingListing>>;

    async fn list_for_hoster(&self, hoster_id: Uuid) -> StoreResult<Vec<BookingListing>>;

    async fn list_customers_for_hoster(&self, hoster_id: Uuid) -> StoreResult<Vec<CustomerInfo>>;

    /// Set `status = to` only while the stored status is still `from`.
    /// Returns false when no row matched.
    async fn update_status_if(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<bool>;
}

/// Catalog collaborator: who owns an item.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn owner_of_item(&self, item_id: Uuid) -> StoreResult<Option<Uuid>>;
}

/// Identity collaborator: every identity record a user has uploaded.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn list_identities(&self, user_id: Uuid) -> StoreResult<Vec<IdentityRecord>>;
}
