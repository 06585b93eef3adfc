use chrono::{DateTime, Utc};
use rentora_core::models::NewBookingItem;
use rentora_core::repository::CatalogRepository;
use rentora_core::{BookingError, CoreResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary totals derived from a basket of line items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub rental: i64,
    pub deposit: i64,
    pub discount: i64,
    pub total: i64,
    pub outstanding: i64,
}

/// Whole calendar days between two instants; partial days are dropped.
pub fn total_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_days()
}

/// Rejects empty or inverted ranges and returns the rental length in days.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<i64> {
    if end <= start {
        return Err(BookingError::InvalidDateRange);
    }
    Ok(total_days(start, end))
}

/// Sums caller-supplied subtotals. The subtotals themselves are trusted as
/// given; only their sign is checked.
pub fn calculate(items: &[NewBookingItem], discount: i64) -> CoreResult<PriceBreakdown> {
    if items.is_empty() {
        return Err(BookingError::NoItemsProvided);
    }
    if discount < 0 {
        return Err(BookingError::InvalidAmount("discount cannot be negative".into()));
    }

    let mut rental: i64 = 0;
    let mut deposit: i64 = 0;

    for item in items {
        if item.quantity <= 0 {
            return Err(BookingError::InvalidAmount(format!(
                "quantity for item {} must be positive",
                item.item_id
            )));
        }
        if item.subtotal_rental < 0
            || item.subtotal_deposit < 0
            || item.price_per_day < 0
            || item.deposit < 0
        {
            return Err(BookingError::InvalidAmount(format!(
                "amounts for item {} cannot be negative",
                item.item_id
            )));
        }

        rental = rental.checked_add(item.subtotal_rental).ok_or_else(overflow)?;
        deposit = deposit.checked_add(item.subtotal_deposit).ok_or_else(overflow)?;
    }

    let gross = rental.checked_add(deposit).ok_or_else(overflow)?;
    if discount > gross {
        return Err(BookingError::InvalidAmount("discount exceeds booking value".into()));
    }
    let total = gross - discount;

    Ok(PriceBreakdown {
        rental,
        deposit,
        discount,
        total,
        outstanding: total,
    })
}

fn overflow() -> BookingError {
    BookingError::InvalidAmount("amount overflow".into())
}

/// Resolves the owning hoster from the first item and requires every other
/// item in the basket to belong to the same hoster.
pub async fn resolve_hoster(
    catalog: &dyn CatalogRepository,
    items: &[NewBookingItem],
) -> CoreResult<Uuid> {
    let first = items.first().ok_or(BookingError::NoItemsProvided)?;

    let hoster_id = lookup_owner(catalog, first.item_id)
        .await?
        .ok_or(BookingError::HosterUnresolved(first.item_id))?;

    for item in items.iter().skip(1) {
        match lookup_owner(catalog, item.item_id).await? {
            Some(owner) if owner == hoster_id => {}
            Some(_) => return Err(BookingError::MixedHosters),
            None => return Err(BookingError::HosterUnresolved(item.item_id)),
        }
    }

    Ok(hoster_id)
}

async fn lookup_owner(catalog: &dyn CatalogRepository, item_id: Uuid) -> CoreResult<Option<Uuid>> {
    catalog
        .owner_of_item(item_id)
        .await
        .map_err(|e| BookingError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn item(subtotal_rental: i64, subtotal_deposit: i64) -> NewBookingItem {
        NewBookingItem {
            item_id: Uuid::new_v4(),
            name: "Camping tent".to_string(),
            price_per_day: 100_000,
            deposit: 500_000,
            quantity: 2,
            subtotal_rental,
            subtotal_deposit,
        }
    }

    #[test]
    fn test_totals_for_single_item_basket() {
        let breakdown = calculate(&[item(1_000_000, 1_000_000)], 0).unwrap();

        assert_eq!(breakdown.rental, 1_000_000);
        assert_eq!(breakdown.deposit, 1_000_000);
        assert_eq!(breakdown.total, 2_000_000);
        assert_eq!(breakdown.outstanding, 2_000_000);
    }

    #[test]
    fn test_total_is_rental_plus_deposit_minus_discount() {
        let items = vec![item(300_000, 50_000), item(120_000, 0), item(0, 75_000)];
        let breakdown = calculate(&items, 45_000).unwrap();

        assert_eq!(breakdown.total, breakdown.rental + breakdown.deposit - breakdown.discount);
        assert_eq!(breakdown.total, 500_000);
        assert_eq!(breakdown.outstanding, breakdown.total);
    }

    #[test]
    fn test_empty_basket_is_rejected() {
        assert_eq!(calculate(&[], 0).unwrap_err(), BookingError::NoItemsProvided);
        assert_eq!(calculate(&[], -5).unwrap_err(), BookingError::NoItemsProvided);
    }

    #[test]
    fn test_discount_larger_than_value_is_rejected() {
        let err = calculate(&[item(100, 0)], 101).unwrap_err();
        assert!(matches!(err, BookingError::InvalidAmount(_)));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut bad = item(100, 0);
        bad.quantity = 0;
        assert!(matches!(calculate(&[bad], 0), Err(BookingError::InvalidAmount(_))));
    }

    #[test]
    fn test_total_days_truncates_partial_days() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let end = start + Duration::days(5) + Duration::hours(23);

        assert_eq!(total_days(start, end), 5);
        assert_eq!(rental_days(start, end).unwrap(), 5);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(rental_days(start, start).unwrap_err(), BookingError::InvalidDateRange);
        assert_eq!(
            rental_days(start, start - Duration::days(1)).unwrap_err(),
            BookingError::InvalidDateRange
        );
    }
}
