//! In-process implementation of the repository traits, used by tests and by
//! local runs without Postgres. Writes go to a cloned copy of the state that
//! replaces the live state only once every insert has succeeded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentora_core::identity::IdentityRecord;
use rentora_core::models::{Booking, BookingItem, BookingStatus, CustomerInfo, CustomerSnapshot};
use rentora_core::repository::{
    BookingListing, BookingRecord, BookingRepository, CatalogRepository, IdentityRepository,
    StoreError, StoreResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct State {
    bookings: HashMap<Uuid, Booking>,
    items: HashMap<Uuid, Vec<BookingItem>>,
    customers: HashMap<Uuid, CustomerSnapshot>,
    catalog: HashMap<Uuid, Uuid>,
    identities: Vec<IdentityRecord>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    fail_item_insert: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a catalog item and its owner.
    pub async fn add_item(&self, item_id: Uuid, hoster_id: Uuid) {
        self.state.write().await.catalog.insert(item_id, hoster_id);
    }

    pub async fn add_identity(&self, record: IdentityRecord) {
        self.state.write().await.identities.push(record);
    }

    /// Makes the next reservation fail after its header has been staged.
    pub fn fail_next_item_insert(&self) {
        self.fail_item_insert.store(true, Ordering::SeqCst);
    }

    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }

    pub async fn item_row_count(&self) -> usize {
        self.state.read().await.items.values().map(Vec::len).sum()
    }

    pub async fn customer_row_count(&self) -> usize {
        self.state.read().await.customers.len()
    }

    fn listings(state: &State, filter: impl Fn(&Booking) -> bool) -> Vec<BookingListing> {
        let mut listings: Vec<BookingListing> = state
            .bookings
            .values()
            .filter(|b| filter(b))
            .map(|b| BookingListing {
                booking: b.clone(),
                item_count: state.items.get(&b.id).map_or(0, |items| items.len() as i64),
            })
            .collect();

        listings.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
        listings
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_booking(&self, record: &BookingRecord) -> StoreResult<()> {
        let mut live = self.state.write().await;
        let mut tx = live.clone();

        let user_id = record.booking.user_id;
        if !tx.identities.iter().any(|r| r.user_id == user_id) {
            return Err(StoreError::IdentityMissing);
        }

        tx.bookings.insert(record.booking.id, record.booking.clone());

        if self.fail_item_insert.swap(false, Ordering::SeqCst) {
            return Err(StoreError::backend("simulated booking_items insert failure"));
        }
        tx.items.insert(record.booking.id, record.items.clone());
        tx.customers.insert(record.booking.id, record.customer.clone());

        *live = tx;
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.state.read().await.bookings.get(&id).cloned())
    }

    async fn get_booking_record(&self, id: Uuid) -> StoreResult<Option<BookingRecord>> {
        let state = self.state.read().await;
        let Some(booking) = state.bookings.get(&id) else {
            return Ok(None);
        };

        let customer = state
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::backend(format!("booking {} has no customer snapshot", id)))?;

        Ok(Some(BookingRecord {
            booking: booking.clone(),
            items: state.items.get(&id).cloned().unwrap_or_default(),
            customer,
        }))
    }

    async fn list_for_renter(&self, user_id: Uuid) -> StoreResult<Vec<BookingListing>> {
        let state = self.state.read().await;
        Ok(Self::listings(&state, move |b| b.user_id == user_id))
    }

    async fn list_for_hoster(&self, hoster_id: Uuid) -> StoreResult<Vec<BookingListing>> {
        let state = self.state.read().await;
        Ok(Self::listings(&state, move |b| b.hoster_id == hoster_id))
    }

    async fn list_customers_for_hoster(&self, hoster_id: Uuid) -> StoreResult<Vec<CustomerInfo>> {
        let state = self.state.read().await;
        let mut by_user: HashMap<Uuid, CustomerInfo> = HashMap::new();

        for booking in state.bookings.values().filter(|b| b.hoster_id == hoster_id) {
            let Some(snapshot) = state.customers.get(&booking.id) else {
                continue;
            };

            let entry = by_user.entry(booking.user_id).or_insert_with(|| CustomerInfo {
                user_id: booking.user_id,
                name: snapshot.name.clone(),
                phone: snapshot.phone.clone(),
                email: snapshot.email.clone(),
                booking_count: 0,
                last_booking_at: booking.created_at,
            });

            entry.booking_count += 1;
            if booking.created_at >= entry.last_booking_at {
                entry.name = snapshot.name.clone();
                entry.phone = snapshot.phone.clone();
                entry.email = snapshot.email.clone();
                entry.last_booking_at = booking.created_at;
            }
        }

        let mut customers: Vec<CustomerInfo> = by_user.into_values().collect();
        customers.sort_by(|a, b| b.last_booking_at.cmp(&a.last_booking_at));
        Ok(customers)
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.bookings.get_mut(&id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                booking.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn owner_of_item(&self, item_id: Uuid) -> StoreResult<Option<Uuid>> {
        Ok(self.state.read().await.catalog.get(&item_id).copied())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn list_identities(&self, user_id: Uuid) -> StoreResult<Vec<IdentityRecord>> {
        Ok(self
            .state
            .read()
            .await
            .identities
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rentora_core::models::DeliveryType;
    use rentora_shared::Masked;

    fn record(user_id: Uuid) -> BookingRecord {
        let now = Utc::now();
        let booking_id = Uuid::new_v4();
        BookingRecord {
            booking: Booking {
                id: booking_id,
                hoster_id: Uuid::new_v4(),
                user_id,
                start_date: now,
                end_date: now + Duration::days(2),
                total_days: 2,
                delivery_type: DeliveryType::Pickup,
                rental_subtotal: 200_000,
                deposit_subtotal: 300_000,
                discount: 0,
                total_amount: 500_000,
                outstanding_amount: 500_000,
                identity_id: None,
                status: BookingStatus::Pending,
                locked_until: now + Duration::minutes(30),
                created_at: now,
                updated_at: now,
            },
            items: vec![BookingItem {
                id: Uuid::new_v4(),
                booking_id,
                item_id: Uuid::new_v4(),
                name: "Camping stove".to_string(),
                price_per_day: 100_000,
                deposit: 300_000,
                quantity: 1,
                subtotal_rental: 200_000,
                subtotal_deposit: 300_000,
                created_at: now,
            }],
            customer: CustomerSnapshot {
                id: Uuid::new_v4(),
                booking_id,
                name: "Budi".to_string(),
                phone: Masked::new("+62 813 0000 222".to_string()),
                email: Masked::new("budi@example.com".to_string()),
                delivery_address: None,
                notes: None,
                created_at: now,
            },
        }
    }

    #[tokio::test]
    async fn test_reservation_without_identity_writes_nothing() {
        let store = InMemoryStore::new();

        let err = store.create_booking(&record(Uuid::new_v4())).await.unwrap_err();

        assert!(matches!(err, StoreError::IdentityMissing));
        assert_eq!(store.booking_count().await, 0);
        assert_eq!(store.item_row_count().await, 0);
        assert_eq!(store.customer_row_count().await, 0);
    }

    #[tokio::test]
    async fn test_reservation_with_identity_writes_all_rows() {
        let store = InMemoryStore::new();
        let renter = Uuid::new_v4();
        store.add_identity(IdentityRecord::pending(renter)).await;

        store.create_booking(&record(renter)).await.unwrap();

        assert_eq!(store.booking_count().await, 1);
        assert_eq!(store.item_row_count().await, 1);
        assert_eq!(store.customer_row_count().await, 1);
    }

    #[tokio::test]
    async fn test_conditional_update_requires_expected_status() {
        let store = InMemoryStore::new();
        let renter = Uuid::new_v4();
        store.add_identity(IdentityRecord::pending(renter)).await;
        let rec = record(renter);
        store.create_booking(&rec).await.unwrap();
        let id = rec.booking.id;

        let stale = store
            .update_status_if(id, BookingStatus::OnProgress, BookingStatus::OnRent, Utc::now())
            .await
            .unwrap();
        assert!(!stale);

        let applied = store
            .update_status_if(id, BookingStatus::Pending, BookingStatus::OnProgress, Utc::now())
            .await
            .unwrap();
        assert!(applied);
        assert_eq!(
            store.get_booking(id).await.unwrap().unwrap().status,
            BookingStatus::OnProgress
        );
    }
}
