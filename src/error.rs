//! Error types for tunelink
//!
//! Every failure path renders a page; nothing here is fatal to the process.
//! User-visible text stays generic for upstream and persistence failures,
//! with the richer detail going to the logs.

use thiserror::Error;

/// Metadata resolver errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup API could not be reached or answered non-success
    #[error("lookup API unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The URL did not resolve to a recognizable release
    #[error("no match for source URL")]
    NoMatch,

    /// The lookup API answered with a body we could not parse
    #[error("unparseable lookup response: {0}")]
    Parse(String),
}

/// Link store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The custom path already holds a record (conditional put lost)
    #[error("custom path already exists")]
    Conflict,

    /// Backend failure (database, filesystem)
    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

/// Smart link service errors, one variant per user-facing failure mode
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Custom path empty or containing disallowed characters
    #[error("invalid custom path: {0:?}")]
    InvalidPath(String),

    /// Custom path already taken
    #[error("custom path already taken: {0:?}")]
    PathTaken(String),

    /// Resolver failure (detail logged, generic message shown)
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Store write failure (detail logged, generic message shown)
    #[error("persistence failure: {0}")]
    Persistence(StoreError),

    /// Unknown custom path on read
    #[error("no record for path: {0:?}")]
    NotFound(String),
}

impl ServiceError {
    /// Text shown to the end user. Resolver and persistence failures
    /// collapse to one generic message each; logs carry the detail.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::InvalidPath(_) => {
                "Custom path can only contain letters, numbers, hyphens (-), and underscores (_)."
                    .to_string()
            }
            ServiceError::PathTaken(_) => "This custom path is already taken.".to_string(),
            ServiceError::Resolve(_) => {
                "Could not find music data for this URL. Please check the link and try again."
                    .to_string()
            }
            ServiceError::Persistence(_) => {
                "An unexpected error occurred while creating the link.".to_string()
            }
            ServiceError::NotFound(_) => "Link not found.".to_string(),
        }
    }
}
