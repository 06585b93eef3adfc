use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rentora_shared::pii::Masked;
use std::fmt;
use std::str::FromStr;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    OnProgress,
    OnRent,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::OnProgress,
        BookingStatus::OnRent,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::OnProgress => "on_progress",
            BookingStatus::OnRent => "on_rent",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown value: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Pickup => "pickup",
            DeliveryType::Delivery => "delivery",
        }
    }
}

impl FromStr for DeliveryType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(DeliveryType::Pickup),
            "delivery" => Ok(DeliveryType::Delivery),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Booking header. Monetary fields are fixed at creation; only `status`
/// and `updated_at` change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub hoster_id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_days: i64,
    pub delivery_type: DeliveryType,
    pub rental_subtotal: i64,
    pub deposit_subtotal: i64,
    pub discount: i64,
    pub total_amount: i64,
    pub outstanding_amount: i64,
    pub identity_id: Option<Uuid>,
    pub status: BookingStatus,
    pub locked_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of a catalog item as it was priced when the booking was made.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingItem {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price_per_day: i64,
    pub deposit: i64,
    pub quantity: i32,
    pub subtotal_rental: i64,
    pub subtotal_deposit: i64,
    pub created_at: DateTime<Utc>,
}

/// Renter contact details copied at booking time, never re-synced with the
/// live profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerSnapshot {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub name: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Line item as supplied by the renter. Subtotals are precomputed by the
/// caller and stored as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookingItem {
    pub item_id: Uuid,
    pub name: String,
    pub price_per_day: i64,
    pub deposit: i64,
    pub quantity: i32,
    pub subtotal_rental: i64,
    pub subtotal_deposit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub delivery_type: DeliveryType,
    pub items: Vec<NewBookingItem>,
    pub customer: CustomerContact,
    #[serde(default)]
    pub discount: i64,
}

/// Header, items and contact snapshot as they are read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub items: Vec<BookingItem>,
    pub customer: CustomerSnapshot,
    pub time_remaining_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    #[serde(flatten)]
    pub booking: Booking,
    pub item_count: i64,
    pub time_remaining_minutes: i64,
}

/// A renter who has booked at least one of a hoster's items, with the
/// contact details from their most recent booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfo {
    pub user_id: Uuid,
    pub name: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    pub booking_count: i64,
    pub last_booking_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub booking_id: Uuid,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_text() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("approved".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&BookingStatus::OnProgress).unwrap();
        assert_eq!(json, "\"on_progress\"");
    }

    #[test]
    fn test_create_booking_discount_defaults_to_zero() {
        let body = serde_json::json!({
            "start_date": "2026-01-01T00:00:00Z",
            "end_date": "2026-01-06T00:00:00Z",
            "delivery_type": "pickup",
            "items": [],
            "customer": {
                "name": "Rina",
                "phone": "0812",
                "email": "rina@example.com",
                "delivery_address": null,
                "notes": null
            }
        });

        let req: CreateBooking = serde_json::from_value(body).unwrap();
        assert_eq!(req.discount, 0);
        assert_eq!(req.delivery_type, DeliveryType::Pickup);
    }
}
