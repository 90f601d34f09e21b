//! Data access layer: one zero-sized repository per table.

pub mod accommodation_image_repo;
pub mod accommodation_repo;
pub mod localized_accommodation_repo;
pub mod location_repo;
pub mod user_repo;

pub use accommodation_image_repo::AccommodationImageRepo;
pub use accommodation_repo::AccommodationRepo;
pub use localized_accommodation_repo::LocalizedAccommodationRepo;
pub use location_repo::LocationRepo;
pub use user_repo::UserRepo;
