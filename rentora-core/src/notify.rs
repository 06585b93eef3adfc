use async_trait::async_trait;
use rentora_shared::models::events::{
    BookingCancelledEvent, BookingCreatedEvent, BookingStatusChangedEvent,
};

/// Outbound notification hook. Delivery (email, SMS) is not implemented;
/// failures here must never fail the booking operation that triggered them.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_created(&self, event: &BookingCreatedEvent);

    async fn booking_status_changed(&self, event: &BookingStatusChangedEvent);

    async fn booking_cancelled(&self, event: &BookingCancelledEvent);
}

pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn booking_created(&self, event: &BookingCreatedEvent) {
        tracing::info!(
            booking_id = %event.booking_id,
            hoster_id = %event.hoster_id,
            total_amount = event.total_amount,
            "notify hoster: new booking"
        );
    }

    async fn booking_status_changed(&self, event: &BookingStatusChangedEvent) {
        tracing::info!(
            booking_id = %event.booking_id,
            from = %event.from_status,
            to = %event.to_status,
            "notify renter: booking status changed"
        );
    }

    async fn booking_cancelled(&self, event: &BookingCancelledEvent) {
        tracing::info!(
            booking_id = %event.booking_id,
            by = %event.actor_role,
            "notify parties: booking cancelled"
        );
    }
}
