use std::sync::Arc;
use rentora_booking::BookingService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub auth: AuthConfig,
}
