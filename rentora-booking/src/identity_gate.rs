use rentora_core::identity::{IdentityRecord, VerificationStatus};
use rentora_core::repository::IdentityRepository;
use rentora_core::{BookingError, CoreResult};
use std::sync::Arc;
use uuid::Uuid;

pub const REUPLOAD_MESSAGE: &str =
    "Your identity document was rejected, please upload a new one";

/// Decides whether a renter's identity documents allow a new booking.
pub struct IdentityGate {
    identities: Arc<dyn IdentityRepository>,
}

impl IdentityGate {
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }

    /// Returns the verified record to attach to a new booking.
    pub async fn resolve(&self, user_id: Uuid) -> CoreResult<IdentityRecord> {
        let records = self
            .identities
            .list_identities(user_id)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        let record = check_identity(&records)?;
        Ok(record.clone())
    }
}

/// Picks the most authoritative record: the most recently verified one if any
/// record is verified, otherwise the most recently uploaded one.
pub fn select_identity(records: &[IdentityRecord]) -> Option<&IdentityRecord> {
    let verified = records
        .iter()
        .filter(|r| r.is_usable())
        .max_by_key(|r| (r.verified_at, r.created_at));

    verified.or_else(|| records.iter().max_by_key(|r| r.created_at))
}

/// Classifies the selected record into a booking decision.
pub fn check_identity(records: &[IdentityRecord]) -> CoreResult<&IdentityRecord> {
    let record = select_identity(records).ok_or(BookingError::IdentityMissing)?;

    if record.is_usable() {
        return Ok(record);
    }

    match record.status {
        VerificationStatus::Rejected => {
            let reason = record
                .rejection_reason
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or(REUPLOAD_MESSAGE);
            Err(BookingError::IdentityRejected(reason.to_string()))
        }
        _ => Err(BookingError::IdentityPending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn uploaded(user_id: Uuid, minutes_ago: i64) -> IdentityRecord {
        let mut record = IdentityRecord::pending(user_id);
        record.created_at = Utc::now() - Duration::minutes(minutes_ago);
        record
    }

    #[test]
    fn test_no_records_is_missing() {
        assert_eq!(check_identity(&[]).unwrap_err(), BookingError::IdentityMissing);
    }

    #[test]
    fn test_latest_rejection_surfaces_reason_verbatim() {
        let user = Uuid::new_v4();
        let records = vec![
            uploaded(user, 60),
            uploaded(user, 5).reject(Some("Photo is blurry")),
        ];

        let err = check_identity(&records).unwrap_err();
        assert_eq!(err, BookingError::IdentityRejected("Photo is blurry".to_string()));
    }

    #[test]
    fn test_rejection_without_reason_asks_for_reupload() {
        let user = Uuid::new_v4();
        let records = vec![uploaded(user, 5).reject(None)];

        let err = check_identity(&records).unwrap_err();
        assert_eq!(err, BookingError::IdentityRejected(REUPLOAD_MESSAGE.to_string()));
    }

    #[test]
    fn test_pending_only_is_not_usable() {
        let user = Uuid::new_v4();
        let records = vec![uploaded(user, 5)];
        assert_eq!(check_identity(&records).unwrap_err(), BookingError::IdentityPending);
    }

    #[test]
    fn test_verified_record_wins_over_newer_upload() {
        let user = Uuid::new_v4();
        let approved = uploaded(user, 120).approve(Utc::now() - Duration::minutes(100));
        let approved_id = approved.id;
        let records = vec![approved, uploaded(user, 1).reject(Some("duplicate"))];

        let record = check_identity(&records).unwrap();
        assert_eq!(record.id, approved_id);
    }

    #[test]
    fn test_most_recently_verified_is_selected() {
        let user = Uuid::new_v4();
        let older = uploaded(user, 300).approve(Utc::now() - Duration::minutes(290));
        let newer = uploaded(user, 200).approve(Utc::now() - Duration::minutes(10));
        let newer_id = newer.id;

        let records = vec![newer, older];
        assert_eq!(select_identity(&records).unwrap().id, newer_id);
    }
}
