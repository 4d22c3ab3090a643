//! Link-aggregation lookup client (Odesli / song.link compatible)
//!
//! One outbound GET per resolution, no retries, bounded timeout. The raw
//! response is validated and normalized once at this boundary; the rest of
//! the service only ever sees [`ResolvedMetadata`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ResolveError;
use crate::models::PlatformEntry;

const USER_AGENT: &str = concat!("tunelink/", env!("CARGO_PKG_VERSION"));
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Thumbnail used when neither the primary nor the Spotify entity has one
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/200";

const FALLBACK_TITLE: &str = "Unknown Release";
const FALLBACK_ARTIST: &str = "Unknown Artist";

/// Normalized resolver output
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    /// `"<artist> - <release>"`
    pub display_title: String,
    pub thumbnail_url: String,
    /// Full platform mapping in upstream order
    pub platform_links: Vec<PlatformEntry>,
}

/// Raw lookup response. All three top-level fields are required for a
/// usable match; any absence means the URL did not resolve.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksResponse {
    pub entity_unique_id: Option<String>,
    /// Platform key -> link object; `serde_json::Map` keeps upstream order
    pub links_by_platform: Option<serde_json::Map<String, serde_json::Value>>,
    pub entities_by_unique_id: Option<HashMap<String, LookupEntity>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntity {
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlatformLink {
    url: Option<String>,
    entity_unique_id: Option<String>,
}

/// Resolver seam; the HTTP client implements it, tests stub it.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, music_url: &str) -> Result<ResolvedMetadata, ResolveError>;
}

/// HTTP client for the lookup API
pub struct OdesliClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OdesliClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ResolveError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(RESOLVE_TIMEOUT)
            .build()
            .map_err(|e| ResolveError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MetadataResolver for OdesliClient {
    async fn resolve(&self, music_url: &str) -> Result<ResolvedMetadata, ResolveError> {
        let url = format!(
            "{}/links?url={}",
            self.base_url,
            urlencoding::encode(music_url)
        );

        tracing::debug!(music_url = %music_url, "querying lookup API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ResolveError::UpstreamUnavailable(format!(
                "status {}: {}",
                status, detail
            )));
        }

        let body: LinksResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Parse(e.to_string()))?;

        let metadata = normalize(body)?;

        tracing::info!(
            music_url = %music_url,
            title = %metadata.display_title,
            platforms = metadata.platform_links.len(),
            "resolved source URL"
        );

        Ok(metadata)
    }
}

/// Normalize a parsed lookup response into display metadata.
///
/// Title and thumbnail start from the primary entity and are independently
/// overridden by the Spotify entity's non-empty fields when one is
/// referenced. The artist name always comes from the primary entity.
pub fn normalize(response: LinksResponse) -> Result<ResolvedMetadata, ResolveError> {
    let (links, entities, primary_id) = match (
        response.links_by_platform,
        response.entities_by_unique_id,
        response.entity_unique_id,
    ) {
        (Some(links), Some(entities), Some(primary_id)) => (links, entities, primary_id),
        _ => return Err(ResolveError::NoMatch),
    };

    let primary = entities.get(&primary_id);

    let mut title = primary
        .and_then(|e| e.title.clone())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    let mut thumbnail_url = primary
        .and_then(|e| e.thumbnail_url.clone())
        .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string());
    let artist_name = primary
        .and_then(|e| e.artist_name.clone())
        .unwrap_or_else(|| FALLBACK_ARTIST.to_string());

    let mut platform_links = Vec::with_capacity(links.len());
    for (platform, value) in &links {
        let raw: RawPlatformLink = match serde_json::from_value(value.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(platform = %platform, error = %e, "skipping malformed platform link");
                continue;
            }
        };
        let Some(url) = raw.url else {
            tracing::debug!(platform = %platform, "skipping platform link without URL");
            continue;
        };
        platform_links.push(PlatformEntry {
            platform: platform.clone(),
            url,
            entity_unique_id: raw.entity_unique_id,
        });
    }

    // Prefer the Spotify listing's title and artwork when present
    let spotify_entity = links
        .get("spotify")
        .and_then(|v| v.get("entityUniqueId"))
        .and_then(|v| v.as_str())
        .and_then(|id| entities.get(id));
    if let Some(spotify) = spotify_entity {
        if let Some(t) = spotify.title.as_deref().filter(|t| !t.is_empty()) {
            title = t.to_string();
        }
        if let Some(thumb) = spotify.thumbnail_url.as_deref().filter(|t| !t.is_empty()) {
            thumbnail_url = thumb.to_string();
        }
    }

    Ok(ResolvedMetadata {
        display_title: format!("{} - {}", artist_name, title),
        thumbnail_url,
        platform_links,
    })
}
