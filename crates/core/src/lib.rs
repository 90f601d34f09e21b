//! Domain logic for the lodging backend.
//!
//! Everything in this crate is free of database access so it can be unit
//! tested directly and shared by the HTTP server and the sitemap command.

pub mod accommodation;
pub mod amenities;
pub mod error;
pub mod image_naming;
pub mod location;
pub mod location_tree;
pub mod registration;
pub mod roles;
pub mod search;
pub mod sitemap;
pub mod storage;
pub mod types;
