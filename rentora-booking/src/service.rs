use chrono::{DateTime, Utc};
use rentora_core::models::{
    Booking, BookingDetail, BookingItem, BookingStatus, BookingSummary, CreateBooking,
    CustomerInfo, CustomerSnapshot, StatusChange,
};
use rentora_core::notify::BookingNotifier;
use rentora_core::repository::{
    BookingListing, BookingRecord, BookingRepository, CatalogRepository, IdentityRepository,
    StoreError,
};
use rentora_core::{BookingError, CoreResult};
use rentora_shared::models::events::{
    BookingCancelledEvent, BookingCreatedEvent, BookingStatusChangedEvent,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::guard::{authorize, Actor};
use crate::identity_gate::IdentityGate;
use crate::lock::{self, DEFAULT_LOCK_MINUTES};
use crate::pricing;
use crate::transitions;

#[derive(Debug, Clone)]
pub struct BookingRules {
    /// Minutes a pending booking stays locked for payment.
    pub lock_minutes: i64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            lock_minutes: DEFAULT_LOCK_MINUTES,
        }
    }
}

/// Entry point for every booking operation. Holds no mutable state of its
/// own; each call runs against the injected repositories.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    catalog: Arc<dyn CatalogRepository>,
    identity_gate: IdentityGate,
    notifier: Arc<dyn BookingNotifier>,
    rules: BookingRules,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        catalog: Arc<dyn CatalogRepository>,
        identities: Arc<dyn IdentityRepository>,
        notifier: Arc<dyn BookingNotifier>,
        rules: BookingRules,
    ) -> Self {
        Self {
            bookings,
            catalog,
            identity_gate: IdentityGate::new(identities),
            notifier,
            rules,
        }
    }

    /// Validate, price and reserve a basket for a renter, returning the
    /// booking as it now exists in storage.
    pub async fn create_booking(
        &self,
        renter_id: Uuid,
        req: CreateBooking,
    ) -> CoreResult<BookingDetail> {
        if req.items.is_empty() {
            return Err(BookingError::NoItemsProvided);
        }
        let total_days = pricing::rental_days(req.start_date, req.end_date)?;
        let price = pricing::calculate(&req.items, req.discount)?;

        let identity = self.identity_gate.resolve(renter_id).await.map_err(|e| {
            warn!(%renter_id, "booking blocked by identity gate: {}", e);
            e
        })?;

        let hoster_id = pricing::resolve_hoster(self.catalog.as_ref(), &req.items).await?;

        let now = Utc::now();
        let booking_id = Uuid::new_v4();
        let locked_until = lock::lock_deadline(now, self.rules.lock_minutes).map_err(|e| {
            error!(lock_minutes = self.rules.lock_minutes, "unusable lock window: {}", e);
            e
        })?;

        let booking = Booking {
            id: booking_id,
            hoster_id,
            user_id: renter_id,
            start_date: req.start_date,
            end_date: req.end_date,
            total_days,
            delivery_type: req.delivery_type,
            rental_subtotal: price.rental,
            deposit_subtotal: price.deposit,
            discount: price.discount,
            total_amount: price.total,
            outstanding_amount: price.outstanding,
            identity_id: Some(identity.id),
            status: BookingStatus::Pending,
            locked_until,
            created_at: now,
            updated_at: now,
        };

        let items: Vec<BookingItem> = req
            .items
            .into_iter()
            .map(|item| BookingItem {
                id: Uuid::new_v4(),
                booking_id,
                item_id: item.item_id,
                name: item.name,
                price_per_day: item.price_per_day,
                deposit: item.deposit,
                quantity: item.quantity,
                subtotal_rental: item.subtotal_rental,
                subtotal_deposit: item.subtotal_deposit,
                created_at: now,
            })
            .collect();

        let contact = req.customer;
        let customer = CustomerSnapshot {
            id: Uuid::new_v4(),
            booking_id,
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            delivery_address: contact.delivery_address,
            notes: contact.notes,
            created_at: now,
        };

        let record = BookingRecord {
            booking,
            items,
            customer,
        };

        match self.bookings.create_booking(&record).await {
            Ok(()) => {}
            Err(StoreError::IdentityMissing) => return Err(BookingError::IdentityMissing),
            Err(e) => return Err(storage_failure("create booking", e)),
        }

        info!(
            %booking_id,
            %renter_id,
            %hoster_id,
            total_amount = price.total,
            items = record.items.len(),
            "booking created"
        );

        // The booking is committed from here on.
        let stored = self
            .bookings
            .get_booking_record(booking_id)
            .await
            .map_err(|e| {
                error!(%booking_id, "booking committed but could not be re-read: {}", e);
                BookingError::Storage(e.to_string())
            })?
            .ok_or_else(|| {
                error!(%booking_id, "booking committed but missing on re-read");
                BookingError::Storage(format!("booking {} missing after commit", booking_id))
            })?;

        self.notifier
            .booking_created(&BookingCreatedEvent {
                booking_id,
                user_id: renter_id,
                hoster_id,
                total_amount: price.total,
                item_count: record.items.len(),
                locked_until: record.booking.locked_until.timestamp(),
                timestamp: now.timestamp(),
            })
            .await;

        Ok(into_detail(stored, Utc::now()))
    }

    pub async fn list_bookings_for_renter(&self, renter_id: Uuid) -> CoreResult<Vec<BookingSummary>> {
        let listings = self
            .bookings
            .list_for_renter(renter_id)
            .await
            .map_err(|e| storage_failure("list renter bookings", e))?;

        Ok(into_summaries(listings, Utc::now()))
    }

    pub async fn list_bookings_for_owner(&self, owner_id: Uuid) -> CoreResult<Vec<BookingSummary>> {
        let listings = self
            .bookings
            .list_for_hoster(owner_id)
            .await
            .map_err(|e| storage_failure("list hoster bookings", e))?;

        Ok(into_summaries(listings, Utc::now()))
    }

    pub async fn list_distinct_customers_for_owner(
        &self,
        owner_id: Uuid,
    ) -> CoreResult<Vec<CustomerInfo>> {
        self.bookings
            .list_customers_for_hoster(owner_id)
            .await
            .map_err(|e| storage_failure("list hoster customers", e))
    }

    pub async fn get_booking_detail(&self, actor: Actor, booking_id: Uuid) -> CoreResult<BookingDetail> {
        let record = self
            .bookings
            .get_booking_record(booking_id)
            .await
            .map_err(|e| storage_failure("get booking", e))?
            .ok_or(BookingError::NotFound(booking_id))?;

        authorize(&actor, &record.booking)?;

        Ok(into_detail(record, Utc::now()))
    }

    /// Moves a booking one step along the hoster lifecycle.
    pub async fn transition_booking_status(
        &self,
        owner_id: Uuid,
        booking_id: Uuid,
        target: BookingStatus,
    ) -> CoreResult<StatusChange> {
        let booking = self.load(booking_id).await?;
        authorize(&Actor::Hoster(owner_id), &booking)?;

        let current = booking.status;
        transitions::validate_transition(current, target)?;

        let change = self.apply_status(&booking, current, target).await?;

        info!(%booking_id, from = %current, to = %target, "booking status changed");
        self.notifier
            .booking_status_changed(&BookingStatusChangedEvent {
                booking_id,
                hoster_id: booking.hoster_id,
                from_status: current.to_string(),
                to_status: target.to_string(),
                timestamp: change.updated_at.timestamp(),
            })
            .await;

        Ok(change)
    }

    /// Cancels a booking that is still pending. Either party may cancel.
    pub async fn cancel_booking(&self, actor: Actor, booking_id: Uuid) -> CoreResult<StatusChange> {
        let booking = self.load(booking_id).await?;
        authorize(&actor, &booking)?;

        transitions::validate_cancellation(booking.status)?;

        let change = self
            .apply_status(&booking, booking.status, BookingStatus::Cancelled)
            .await?;

        info!(%booking_id, by = actor.role(), "booking cancelled");
        self.notifier
            .booking_cancelled(&BookingCancelledEvent {
                booking_id,
                cancelled_by: actor.id(),
                actor_role: actor.role().to_string(),
                timestamp: change.updated_at.timestamp(),
            })
            .await;

        Ok(change)
    }

    async fn load(&self, booking_id: Uuid) -> CoreResult<Booking> {
        self.bookings
            .get_booking(booking_id)
            .await
            .map_err(|e| storage_failure("get booking", e))?
            .ok_or(BookingError::NotFound(booking_id))
    }

    /// Conditional write: only succeeds if nobody changed the status since
    /// it was read.
    async fn apply_status(
        &self,
        booking: &Booking,
        from: BookingStatus,
        to: BookingStatus,
    ) -> CoreResult<StatusChange> {
        let now = Utc::now();
        let updated = self
            .bookings
            .update_status_if(booking.id, from, to, now)
            .await
            .map_err(|e| storage_failure("update booking status", e))?;

        if !updated {
            let latest = self.load(booking.id).await?;
            warn!(
                booking_id = %booking.id,
                expected = %from,
                found = %latest.status,
                "concurrent status change detected"
            );
            return Err(BookingError::InvalidStatus {
                from: latest.status,
                to,
            });
        }

        Ok(StatusChange {
            booking_id: booking.id,
            from,
            to,
            updated_at: now,
        })
    }
}

fn storage_failure(operation: &str, err: StoreError) -> BookingError {
    error!("storage failure during {}: {}", operation, err);
    BookingError::Storage(err.to_string())
}

fn into_detail(record: BookingRecord, now: DateTime<Utc>) -> BookingDetail {
    let time_remaining_minutes = lock::time_remaining_minutes(record.booking.locked_until, now);
    BookingDetail {
        booking: record.booking,
        items: record.items,
        customer: record.customer,
        time_remaining_minutes,
    }
}

fn into_summaries(listings: Vec<BookingListing>, now: DateTime<Utc>) -> Vec<BookingSummary> {
    listings
        .into_iter()
        .map(|listing| BookingSummary {
            time_remaining_minutes: lock::time_remaining_minutes(listing.booking.locked_until, now),
            item_count: listing.item_count,
            booking: listing.booking,
        })
        .collect()
}
