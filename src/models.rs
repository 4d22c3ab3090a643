//! Persisted data model
//!
//! A `LinkRecord` is the durable result of one successful resolution, keyed
//! by the user-chosen custom path. Records are created once and never
//! updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One platform's link as returned by the lookup API.
///
/// Entries keep the upstream order; the preferred display order is applied
/// at render time by the presentation formatter, never in the stored data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    /// Platform key as used by the lookup API (e.g. `spotify`, `appleMusic`)
    pub platform: String,
    /// Direct URL to the release on this platform
    pub url: String,
    /// Upstream entity identifier for this platform's listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_unique_id: Option<String>,
}

/// Best-effort provenance captured at creation time.
///
/// Every field is optional; enrichment failures leave fields absent rather
/// than failing the create operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_isp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Persisted smart link record, keyed by `custom_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Unique key; matches `^[A-Za-z0-9_-]+$`
    pub custom_path: String,
    /// `"<artist> - <release>"`
    pub display_title: String,
    /// Cover art URL (placeholder when the upstream had none)
    pub thumbnail_url: String,
    /// Full platform mapping from the lookup API, in upstream order
    pub platform_links: Vec<PlatformEntry>,
    #[serde(flatten)]
    pub provenance: Provenance,
}
