pub mod auth;

pub use auth::{customer_auth_middleware, hoster_auth_middleware, AuthUser, Claims};
