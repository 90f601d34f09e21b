pub mod accommodation;
pub mod auth;
pub mod image;
pub mod listing;
pub mod localized;
pub mod location;
pub mod sitemap;
