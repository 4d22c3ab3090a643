//! Outbound service clients

pub mod geoip;
pub mod odesli;

pub use geoip::{GeoClient, GeoInfo, GeoResolver};
pub use odesli::{MetadataResolver, OdesliClient, ResolvedMetadata};
