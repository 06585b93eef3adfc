pub mod models;
pub mod identity;
pub mod repository;
pub mod notify;

pub use models::{
    Booking, BookingDetail, BookingItem, BookingStatus, BookingSummary, CreateBooking,
    CustomerContact, CustomerInfo, CustomerSnapshot, DeliveryType, NewBookingItem, StatusChange,
};
pub use identity::{IdentityRecord, VerificationStatus};

/// Every failure the booking engine can report. Callers match on the variant,
/// never on the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("At least one item is required to create a booking")]
    NoItemsProvided,
    #[error("End date must be after start date")]
    InvalidDateRange,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Owner of item {0} could not be resolved")]
    HosterUnresolved(uuid::Uuid),
    #[error("All items in a booking must belong to the same hoster")]
    MixedHosters,

    #[error("Please upload an identity document before booking")]
    IdentityMissing,
    #[error("Identity document is still waiting for verification")]
    IdentityPending,
    #[error("Identity document was rejected: {0}")]
    IdentityRejected(String),

    #[error("Booking does not belong to the acting user")]
    Unauthorized,
    #[error("Booking not found: {0}")]
    NotFound(uuid::Uuid),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatus { from: BookingStatus, to: BookingStatus },

    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Payment lock of {0} minutes is outside the supported range")]
    InvalidLockWindow(i64),
}

pub type CoreResult<T> = Result<T, BookingError>;
