//! Smart link service
//!
//! Orchestrates one create request: validate the requested path, enforce
//! uniqueness, resolve the source URL, enrich provenance, persist. Reads
//! (view, list) pass straight through to the store.
//!
//! All collaborators are injected at construction; there is no ambient
//! state.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::error::{ServiceError, StoreError};
use crate::models::{LinkRecord, Provenance};
use crate::services::{GeoResolver, MetadataResolver};
use crate::store::LinkStore;

/// One inbound create request
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub music_url: String,
    pub custom_path: String,
    pub requester_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Allowed custom paths: non-empty, `[A-Za-z0-9_-]` only
pub fn is_valid_custom_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub struct SmartLinkService {
    store: Arc<dyn LinkStore>,
    resolver: Arc<dyn MetadataResolver>,
    geo: Option<Arc<dyn GeoResolver>>,
}

impl SmartLinkService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        resolver: Arc<dyn MetadataResolver>,
        geo: Option<Arc<dyn GeoResolver>>,
    ) -> Self {
        Self {
            store,
            resolver,
            geo,
        }
    }

    /// Create a link record under the requested custom path.
    ///
    /// The uniqueness pre-check fails duplicates before any network call;
    /// the store's conditional insert closes the remaining race, so a
    /// concurrent create of the same path still surfaces as `PathTaken`.
    pub async fn create_link(&self, request: CreateRequest) -> Result<LinkRecord, ServiceError> {
        if !is_valid_custom_path(&request.custom_path) {
            debug!(path = %request.custom_path, "rejected invalid custom path");
            return Err(ServiceError::InvalidPath(request.custom_path));
        }

        let taken = self
            .store
            .exists(&request.custom_path)
            .await
            .map_err(ServiceError::Persistence)?;
        if taken {
            debug!(path = %request.custom_path, "rejected duplicate custom path");
            return Err(ServiceError::PathTaken(request.custom_path));
        }

        let metadata = self
            .resolver
            .resolve(&request.music_url)
            .await
            .map_err(|e| {
                warn!(music_url = %request.music_url, error = %e, "resolution failed");
                ServiceError::Resolve(e)
            })?;

        let record = LinkRecord {
            custom_path: request.custom_path.clone(),
            display_title: metadata.display_title,
            thumbnail_url: metadata.thumbnail_url,
            platform_links: metadata.platform_links,
            provenance: self
                .enrich_provenance(request.requester_ip, request.user_agent)
                .await,
        };

        match self.store.put(record.clone()).await {
            Ok(()) => Ok(record),
            Err(StoreError::Conflict) => {
                // Lost the race to a concurrent create for the same path
                debug!(path = %record.custom_path, "conditional insert lost to concurrent create");
                Err(ServiceError::PathTaken(record.custom_path))
            }
            Err(e) => {
                error!(path = %record.custom_path, error = %e, "store write failed");
                Err(ServiceError::Persistence(e))
            }
        }
    }

    /// Best-effort provenance; no sub-call failure reaches the caller.
    async fn enrich_provenance(
        &self,
        requester_ip: Option<String>,
        user_agent: Option<String>,
    ) -> Provenance {
        let geo = match (&self.geo, requester_ip.as_deref()) {
            (Some(geo), Some(ip)) => geo.lookup(ip).await,
            _ => None,
        };

        Provenance {
            created_at: Some(Utc::now()),
            requester_ip,
            geo_country: geo.as_ref().map(|g| g.country.clone()),
            geo_isp: geo.map(|g| g.isp),
            user_agent,
        }
    }

    /// Landing-page lookup
    pub async fn view(&self, path: &str) -> Result<LinkRecord, ServiceError> {
        self.store
            .get(path)
            .await
            .map_err(ServiceError::Persistence)?
            .ok_or_else(|| ServiceError::NotFound(path.to_string()))
    }

    /// Full enumeration for the list page
    pub async fn list(&self) -> Result<Vec<LinkRecord>, ServiceError> {
        self.store.list_all().await.map_err(ServiceError::Persistence)
    }
}

/// Shareable absolute URL for a created path
pub fn share_url(host: &str, custom_path: &str) -> String {
    format!("https://{}/{}", host, custom_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::models::PlatformEntry;
    use crate::services::odesli::ResolvedMetadata;
    use crate::services::GeoInfo;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolver stub that counts invocations
    struct StubResolver {
        calls: AtomicUsize,
        outcome: fn() -> Result<ResolvedMetadata, ResolveError>,
    }

    impl StubResolver {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome: || {
                    Ok(ResolvedMetadata {
                        display_title: "Artist X - Original".to_string(),
                        thumbnail_url: "https://img.example/a.jpg".to_string(),
                        platform_links: vec![PlatformEntry {
                            platform: "spotify".to_string(),
                            url: "https://spotify.example/1".to_string(),
                            entity_unique_id: None,
                        }],
                    })
                },
            }
        }

        fn no_match() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome: || Err(ResolveError::NoMatch),
            }
        }
    }

    #[async_trait]
    impl MetadataResolver for StubResolver {
        async fn resolve(&self, _music_url: &str) -> Result<ResolvedMetadata, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    /// Geo stub that always fails its lookup
    struct NoGeo;

    #[async_trait]
    impl GeoResolver for NoGeo {
        async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
            None
        }
    }

    /// Store stub simulating a create that loses the race: the pre-check
    /// sees an absent path but the conditional insert reports a conflict.
    struct RacyStore;

    #[async_trait]
    impl crate::store::LinkStore for RacyStore {
        async fn exists(&self, _path: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn get(&self, _path: &str) -> Result<Option<LinkRecord>, StoreError> {
            Ok(None)
        }
        async fn put(&self, _record: LinkRecord) -> Result<(), StoreError> {
            Err(StoreError::Conflict)
        }
        async fn list_all(&self) -> Result<Vec<LinkRecord>, StoreError> {
            Ok(vec![])
        }
    }

    fn request(path: &str) -> CreateRequest {
        CreateRequest {
            music_url: "https://open.spotify.com/track/xyz".to_string(),
            custom_path: path.to_string(),
            requester_ip: Some("203.0.113.7".to_string()),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[test]
    fn test_path_validation() {
        assert!(is_valid_custom_path("my-release_01"));
        assert!(is_valid_custom_path("A"));
        assert!(!is_valid_custom_path(""));
        assert!(!is_valid_custom_path("has space"));
        assert!(!is_valid_custom_path("slash/path"));
        assert!(!is_valid_custom_path("émoji"));
        assert!(!is_valid_custom_path("dot.dot"));
    }

    #[tokio::test]
    async fn test_create_persists_record() {
        let store = Arc::new(MemoryStore::new());
        let service = SmartLinkService::new(store.clone(), Arc::new(StubResolver::ok()), None);

        let record = service.create_link(request("my-release")).await.unwrap();
        assert_eq!(record.display_title, "Artist X - Original");
        assert!(record.provenance.created_at.is_some());
        assert_eq!(record.provenance.requester_ip.as_deref(), Some("203.0.113.7"));

        let viewed = service.view("my-release").await.unwrap();
        assert_eq!(viewed.platform_links, record.platform_links);
    }

    #[tokio::test]
    async fn test_invalid_path_makes_no_calls() {
        let resolver = Arc::new(StubResolver::ok());
        let service =
            SmartLinkService::new(Arc::new(MemoryStore::new()), resolver.clone(), None);

        let result = service.create_link(request("bad path!")).await;
        assert!(matches!(result, Err(ServiceError::InvalidPath(_))));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_path_rejected_without_resolver_call() {
        let store = Arc::new(MemoryStore::new());
        let first = Arc::new(StubResolver::ok());
        let service = SmartLinkService::new(store.clone(), first, None);
        service.create_link(request("taken")).await.unwrap();

        let resolver = Arc::new(StubResolver::ok());
        let service = SmartLinkService::new(store, resolver.clone(), None);
        let result = service.create_link(request("taken")).await;

        assert!(matches!(result, Err(ServiceError::PathTaken(_))));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolution_failure_persists_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service =
            SmartLinkService::new(store.clone(), Arc::new(StubResolver::no_match()), None);

        let result = service.create_link(request("ghost")).await;
        assert!(matches!(
            result,
            Err(ServiceError::Resolve(ResolveError::NoMatch))
        ));
        assert!(!store.exists("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_geo_failure_still_creates() {
        let service = SmartLinkService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StubResolver::ok()),
            Some(Arc::new(NoGeo)),
        );

        let record = service.create_link(request("geo-less")).await.unwrap();
        assert!(record.provenance.geo_country.is_none());
        assert!(record.provenance.created_at.is_some());
    }

    #[tokio::test]
    async fn test_lost_race_surfaces_as_path_taken() {
        let service =
            SmartLinkService::new(Arc::new(RacyStore), Arc::new(StubResolver::ok()), None);

        let result = service.create_link(request("contended")).await;
        assert!(matches!(result, Err(ServiceError::PathTaken(_))));
    }

    #[tokio::test]
    async fn test_view_unknown_path_is_not_found() {
        let service =
            SmartLinkService::new(Arc::new(MemoryStore::new()), Arc::new(StubResolver::ok()), None);

        assert!(matches!(
            service.view("missing").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_share_url_shape() {
        assert_eq!(
            share_url("links.example.com", "my-release"),
            "https://links.example.com/my-release"
        );
    }
}
