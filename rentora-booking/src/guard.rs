use rentora_core::models::Booking;
use rentora_core::{BookingError, CoreResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated party acting on a booking, passed explicitly into every
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Renter(Uuid),
    Hoster(Uuid),
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::Renter(id) | Actor::Hoster(id) => *id,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Actor::Renter(_) => "renter",
            Actor::Hoster(_) => "hoster",
        }
    }
}

/// Renters may only see their own bookings; hosters only bookings of their
/// items.
pub fn authorize(actor: &Actor, booking: &Booking) -> CoreResult<()> {
    let allowed = match actor {
        Actor::Renter(user_id) => booking.user_id == *user_id,
        Actor::Hoster(hoster_id) => booking.hoster_id == *hoster_id,
    };

    if allowed {
        Ok(())
    } else {
        Err(BookingError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rentora_core::models::{BookingStatus, DeliveryType};

    fn booking(user_id: Uuid, hoster_id: Uuid) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            hoster_id,
            user_id,
            start_date: now,
            end_date: now + Duration::days(2),
            total_days: 2,
            delivery_type: DeliveryType::Delivery,
            rental_subtotal: 200,
            deposit_subtotal: 100,
            discount: 0,
            total_amount: 300,
            outstanding_amount: 300,
            identity_id: None,
            status: BookingStatus::Pending,
            locked_until: now + Duration::minutes(30),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parties_are_allowed() {
        let (renter, hoster) = (Uuid::new_v4(), Uuid::new_v4());
        let b = booking(renter, hoster);

        assert!(authorize(&Actor::Renter(renter), &b).is_ok());
        assert!(authorize(&Actor::Hoster(hoster), &b).is_ok());
    }

    #[test]
    fn test_strangers_are_unauthorized() {
        let (renter, hoster) = (Uuid::new_v4(), Uuid::new_v4());
        let b = booking(renter, hoster);

        assert_eq!(
            authorize(&Actor::Hoster(Uuid::new_v4()), &b).unwrap_err(),
            BookingError::Unauthorized
        );
        assert_eq!(
            authorize(&Actor::Renter(Uuid::new_v4()), &b).unwrap_err(),
            BookingError::Unauthorized
        );
    }

    #[test]
    fn test_roles_are_not_interchangeable() {
        let (renter, hoster) = (Uuid::new_v4(), Uuid::new_v4());
        let b = booking(renter, hoster);

        assert!(authorize(&Actor::Hoster(renter), &b).is_err());
        assert!(authorize(&Actor::Renter(hoster), &b).is_err());
    }
}
