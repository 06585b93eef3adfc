use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::models::UnknownVariant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "approved" => Ok(VerificationStatus::Approved),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// One identity document upload and its review outcome. Owned by the identity
/// service; the booking engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: VerificationStatus,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl IdentityRecord {
    pub fn pending(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: VerificationStatus::Pending,
            verified: false,
            verified_at: None,
            rejection_reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn approve(mut self, at: DateTime<Utc>) -> Self {
        self.status = VerificationStatus::Approved;
        self.verified = true;
        self.verified_at = Some(at);
        self
    }

    pub fn reject(mut self, reason: Option<&str>) -> Self {
        self.status = VerificationStatus::Rejected;
        self.verified = false;
        self.verified_at = None;
        self.rejection_reason = reason.map(str::to_string);
        self
    }

    /// Only verified records may authorize a booking.
    pub fn is_usable(&self) -> bool {
        self.verified
    }
}
