use chrono::{DateTime, Duration, Utc};
use rentora_core::{BookingError, CoreResult};

pub const DEFAULT_LOCK_MINUTES: i64 = 30;

/// One week.
pub const MAX_LOCK_MINUTES: i64 = 7 * 24 * 60;

/// Deadline by which a freshly created pending booking is expected to be paid.
/// The window must be positive and at most [`MAX_LOCK_MINUTES`].
pub fn lock_deadline(created_at: DateTime<Utc>, lock_minutes: i64) -> CoreResult<DateTime<Utc>> {
    if !(1..=MAX_LOCK_MINUTES).contains(&lock_minutes) {
        return Err(BookingError::InvalidLockWindow(lock_minutes));
    }

    Duration::try_minutes(lock_minutes)
        .and_then(|window| created_at.checked_add_signed(window))
        .ok_or(BookingError::InvalidLockWindow(lock_minutes))
}

/// Whole minutes left before the lock expires, rounded up and floored at zero.
/// Derived on every read, never stored.
pub fn time_remaining_minutes(locked_until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = locked_until - now;
    if remaining <= Duration::zero() {
        return 0;
    }

    // Anything left, even under a millisecond, counts as one minute.
    let millis = remaining.num_milliseconds();
    ((millis + 59_999) / 60_000).max(1)
}

pub fn is_lock_expired(locked_until: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= locked_until
}
