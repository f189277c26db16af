//! Tree data-fetch client
//!
//! Resolves a slash-delimited path to a subtree over HTTP. A non-success
//! response walks up to the parent path and retries until something is
//! found or no parent remains, so a query for a missing leaf yields its
//! nearest existing ancestor. Transport and decode failures end the walk.
//!
//! Errors never leave this module: every call resolves to a [`FetchOutcome`].

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::tree::{normalize_query, parent_path, Node};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// `resolved` differs from `requested` when the ancestor fallback kicked in.
    Found {
        node: Node,
        requested: String,
        resolved: String,
    },
    /// Every path up to the root answered non-success.
    NotFound { requested: String },
    /// Transport or decode failure.
    Failed { requested: String, reason: String },
}

impl FetchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found { .. })
    }

    pub fn is_fallback(&self) -> bool {
        match self {
            FetchOutcome::Found {
                requested,
                resolved,
                ..
            } => requested != resolved,
            _ => false,
        }
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            FetchOutcome::Found { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Collapse to the node-or-nothing view used by the tree container.
    pub fn into_node(self) -> Option<Node> {
        match self {
            FetchOutcome::Found { node, .. } => Some(node),
            _ => None,
        }
    }
}

/// Anything that can resolve a path to a subtree.
#[async_trait]
pub trait TreeSource: Send + Sync {
    async fn fetch(&self, path: &str) -> FetchOutcome;
}

/// `GET {base_url}/{percent-encoded path}` against the entity API.
pub struct HttpTreeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTreeSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The whole path is encoded as one segment; inner slashes become `%2F`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(path))
    }

    /// One request, no fallback. `Ok(None)` for any non-2xx status.
    async fn fetch_exact(&self, path: &str) -> Result<Option<Node>, ApiError> {
        let url = self.url_for(path);
        debug!(url = %url, "Fetching subtree");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Subtree request not successful");
            return Ok(None);
        }
        let node = response.json::<Node>().await?;
        Ok(Some(node))
    }
}

#[async_trait]
impl TreeSource for HttpTreeSource {
    async fn fetch(&self, path: &str) -> FetchOutcome {
        let requested = normalize_query(path).to_string();
        let mut current = requested.clone();

        loop {
            match self.fetch_exact(&current).await {
                Ok(Some(node)) => {
                    if current != requested {
                        info!(
                            requested = %requested,
                            resolved = %current,
                            "Path not found, showing nearest ancestor"
                        );
                    }
                    return FetchOutcome::Found {
                        node,
                        requested,
                        resolved: current,
                    };
                }
                Ok(None) => match parent_path(&current) {
                    Some(parent) => current = normalize_query(parent).to_string(),
                    None => {
                        warn!(requested = %requested, "No data for query");
                        return FetchOutcome::NotFound { requested };
                    }
                },
                Err(e) => {
                    warn!(requested = %requested, path = %current, error = %e, "Subtree fetch failed");
                    return FetchOutcome::Failed {
                        requested,
                        reason: e.to_string(),
                    };
                }
            }
        }
    }
}
