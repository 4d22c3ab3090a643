//! Best-effort IP geolocation
//!
//! Used only to enrich record provenance. Failures are swallowed with a
//! debug log; the create operation never waits more than the short client
//! timeout and never fails because of this lookup.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

const GEO_TIMEOUT: Duration = Duration::from_secs(2);

/// Country and ISP for a requester IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: String,
    pub isp: String,
}

/// Geolocation seam; `None` means the lookup failed or had no answer.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;
}

/// ip-api.com style JSON response
#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: Option<String>,
    country: Option<String>,
    isp: Option<String>,
}

/// HTTP client for the geolocation API
pub struct GeoClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeoClient {
    pub fn new(base_url: impl Into<String>) -> Option<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(GEO_TIMEOUT)
            .build()
            .ok()?;

        Some(Self {
            http_client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl GeoResolver for GeoClient {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(ip));

        let response = match self.http_client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(ip = %ip, error = %e, "geolocation lookup failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(ip = %ip, status = %response.status(), "geolocation lookup rejected");
            return None;
        }

        let body: GeoResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(ip = %ip, error = %e, "geolocation response unparseable");
                return None;
            }
        };

        if body.status.as_deref() == Some("fail") {
            tracing::debug!(ip = %ip, "geolocation lookup had no answer");
            return None;
        }

        Some(GeoInfo {
            country: body.country?,
            isp: body.isp.unwrap_or_default(),
        })
    }
}
