pub mod app_config;
pub mod database;
pub mod booking_repo;
pub mod catalog_repo;
pub mod identity_repo;

pub use database::DbClient;
pub use booking_repo::PgBookingRepository;
pub use catalog_repo::PgCatalogRepository;
pub use identity_repo::PgIdentityRepository;
