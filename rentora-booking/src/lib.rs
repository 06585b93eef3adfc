pub mod identity_gate;
pub mod pricing;
pub mod lock;
pub mod transitions;
pub mod guard;
pub mod service;
pub mod memory;

pub use guard::Actor;
pub use identity_gate::IdentityGate;
pub use memory::InMemoryStore;
pub use pricing::PriceBreakdown;
pub use service::{BookingRules, BookingService};
