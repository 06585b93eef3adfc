pub mod events;

pub use events::{BookingCancelledEvent, BookingCreatedEvent, BookingStatusChangedEvent};
