use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCreatedEvent {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub hoster_id: Uuid,
    pub total_amount: i64,
    pub item_count: usize,
    pub locked_until: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingStatusChangedEvent {
    pub booking_id: Uuid,
    pub hoster_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub cancelled_by: Uuid,
    pub actor_role: String,
    pub timestamp: i64,
}
