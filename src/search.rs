//! Search input with trailing debounce
//!
//! Each edit restarts a cancelable timer; only the edit that survives the
//! idle window issues a fetch. Fetches themselves are not cancelled once
//! started, so every scheduled search carries a monotonic sequence number
//! and only the result matching the latest one is applied.

use crate::client::{FetchOutcome, TreeSource};
use crate::tree::Node;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

pub const PLACEHOLDER: &str = "Enter node path (i.e. Rocket, Rocket/Stage1)";

/// Outcome of the most recent applied search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Last search returned a node.
    Success,
    /// Nothing applied yet, or the last search returned nothing.
    Warning,
}

/// A completed fetch, tagged with the sequence number it was issued under.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub seq: u64,
    pub query: String,
    pub outcome: FetchOutcome,
}

/// Holds at most one pending delayed task.
///
/// Scheduling replaces (aborts) the pending task; dropping the debouncer
/// aborts it as well. The scheduled future is detached once the delay has
/// elapsed and is not affected by later cancellation.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `task` after the idle window unless rescheduled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Path query box: edits schedule debounced fetches whose results are
/// delivered on a channel to the container.
pub struct SearchInput {
    query: String,
    status: RequestStatus,
    loading: bool,
    latest_seq: u64,
    debouncer: Debouncer,
    source: Arc<dyn TreeSource>,
    results: mpsc::UnboundedSender<SearchResult>,
}

impl SearchInput {
    pub fn new(
        source: Arc<dyn TreeSource>,
        debounce: Duration,
        results: mpsc::UnboundedSender<SearchResult>,
    ) -> Self {
        Self {
            query: String::new(),
            status: RequestStatus::Warning,
            loading: false,
            latest_seq: 0,
            debouncer: Debouncer::new(debounce),
            source,
            results,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.schedule_search();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.schedule_search();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.schedule_search();
        }
    }

    fn schedule_search(&mut self) {
        self.latest_seq += 1;
        self.loading = true;

        let seq = self.latest_seq;
        let query = self.query.clone();
        let source = Arc::clone(&self.source);
        let results = self.results.clone();
        debug!(seq, query = %query, "Search scheduled");

        self.debouncer.schedule(async move {
            let outcome = source.fetch(&query).await;
            if results.send(SearchResult { seq, query, outcome }).is_err() {
                debug!(seq, "Search result receiver dropped");
            }
        });
    }

    /// Record a completed search.
    ///
    /// Returns the node the container should display, or `None` when the
    /// result is stale or empty (the caller keeps what it already shows).
    pub fn complete(&mut self, result: SearchResult) -> Option<Node> {
        if result.seq != self.latest_seq {
            debug!(
                seq = result.seq,
                latest = self.latest_seq,
                query = %result.query,
                "Dropping stale search result"
            );
            return None;
        }
        self.loading = false;
        self.status = if result.outcome.is_found() {
            RequestStatus::Success
        } else {
            RequestStatus::Warning
        };
        result.outcome.into_node()
    }
}
