use rentora_core::models::BookingStatus;
use rentora_core::{BookingError, CoreResult};

/// The one legal successor of each status on the hoster-driven path
/// `pending -> on_progress -> on_rent -> completed`.
pub fn next_status(current: BookingStatus) -> Option<BookingStatus> {
    match current {
        BookingStatus::Pending => Some(BookingStatus::OnProgress),
        BookingStatus::OnProgress => Some(BookingStatus::OnRent),
        BookingStatus::OnRent => Some(BookingStatus::Completed),
        BookingStatus::Completed | BookingStatus::Cancelled => None,
    }
}

/// Accepts `target` only if it is exactly the next step after `current`.
pub fn validate_transition(current: BookingStatus, target: BookingStatus) -> CoreResult<()> {
    match next_status(current) {
        Some(expected) if expected == target => Ok(()),
        _ => Err(BookingError::InvalidStatus {
            from: current,
            to: target,
        }),
    }
}

/// Cancellation is only possible before the hoster starts preparing the items.
pub fn validate_cancellation(current: BookingStatus) -> CoreResult<()> {
    if current == BookingStatus::Pending {
        Ok(())
    } else {
        Err(BookingError::InvalidStatus {
            from: current,
            to: BookingStatus::Cancelled,
        })
    }
}

pub fn is_terminal(status: BookingStatus) -> bool {
    next_status(status).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_lifecycle() {
        let path = [
            BookingStatus::Pending,
            BookingStatus::OnProgress,
            BookingStatus::OnRent,
            BookingStatus::Completed,
        ];

        for pair in path.windows(2) {
            assert!(validate_transition(pair[0], pair[1]).is_ok());
        }
    }

    #[test]
    fn test_pending_only_accepts_on_progress() {
        for target in [
            BookingStatus::Pending,
            BookingStatus::OnRent,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let err = validate_transition(BookingStatus::Pending, target).unwrap_err();
            assert_eq!(
                err,
                BookingError::InvalidStatus {
                    from: BookingStatus::Pending,
                    to: target
                }
            );
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for current in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(is_terminal(current));
            for target in BookingStatus::ALL {
                assert!(validate_transition(current, target).is_err());
            }
        }
    }

    #[test]
    fn test_no_going_backward() {
        assert!(validate_transition(BookingStatus::OnRent, BookingStatus::Pending).is_err());
        assert!(validate_transition(BookingStatus::OnRent, BookingStatus::OnProgress).is_err());
        assert!(validate_transition(BookingStatus::OnProgress, BookingStatus::Pending).is_err());
    }

    #[test]
    fn test_cancellation_only_while_pending() {
        assert!(validate_cancellation(BookingStatus::Pending).is_ok());
        for current in [
            BookingStatus::OnProgress,
            BookingStatus::OnRent,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert!(validate_cancellation(current).is_err());
        }
    }
}
