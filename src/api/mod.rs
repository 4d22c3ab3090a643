//! HTTP handlers for tunelink

pub mod health;
pub mod pages;
pub mod render;

pub use health::health_routes;
pub use pages::{create_link, index, landing_page, list_links};
