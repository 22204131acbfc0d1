//! Offset pagination over a channel's history.

use crate::{HistoryPage, InputPeer, ResolvedPeer};
use herald_core::{FetchWindow, MessageRecord};
use herald_error::{UpstreamError, UpstreamErrorKind};
use herald_rate_limit::{RateLimitedCaller, Sleeper};
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Pause between consecutive page fetches.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Result of one pagination run.
///
/// `completed` is false when a page failed and the run stopped early; the
/// records gathered before the failure are still returned and `failure`
/// holds the error that ended the run. A failure on the very first page
/// yields an outcome with no records, which is still a usable result.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    records: Vec<MessageRecord>,
    completed: bool,
    pages_fetched: usize,
    failure: Option<UpstreamError>,
}

impl FetchOutcome {
    /// Outcome of a run that visited every scheduled page.
    pub fn complete(records: Vec<MessageRecord>, pages_fetched: usize) -> Self {
        Self {
            records,
            completed: true,
            pages_fetched,
            failure: None,
        }
    }

    /// Outcome of a run cut short by `failure`.
    pub fn partial(records: Vec<MessageRecord>, pages_fetched: usize, failure: UpstreamError) -> Self {
        Self {
            records,
            completed: false,
            pages_fetched,
            failure: Some(failure),
        }
    }

    /// Records gathered, in fetch order.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Whether every scheduled page was visited.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Number of pages that arrived.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Error that ended the run early.
    pub fn failure(&self) -> Option<&UpstreamError> {
        self.failure.as_ref()
    }

    /// Take the records, discarding run metadata.
    pub fn into_records(self) -> Vec<MessageRecord> {
        self.records
    }
}

/// Walks a channel's history page by page.
#[derive(Debug, Clone)]
pub struct HistoryPaginator {
    caller: RateLimitedCaller,
    page_delay: Duration,
}

impl HistoryPaginator {
    /// Paginator using the default inter-page delay.
    pub fn new(caller: RateLimitedCaller) -> Self {
        Self::with_page_delay(caller, DEFAULT_PAGE_DELAY)
    }

    /// Paginator pausing `page_delay` between pages.
    pub fn with_page_delay(caller: RateLimitedCaller, page_delay: Duration) -> Self {
        Self { caller, page_delay }
    }

    /// Resolve a channel username into an input peer.
    ///
    /// # Errors
    ///
    /// Fails with the caller's error, with `MalformedResponse` if the result
    /// cannot be decoded, or with `PeerNotFound` if it names no channel.
    #[instrument(skip(self))]
    pub async fn resolve_peer(&self, username: &str) -> Result<InputPeer, UpstreamError> {
        let result = self
            .caller
            .call("contacts.resolveUsername", &json!({ "username": username }))
            .await?;
        let resolved: ResolvedPeer = decode("contacts.resolveUsername", result)?;

        let peer = resolved
            .input_peer()
            .ok_or_else(|| UpstreamError::new(UpstreamErrorKind::PeerNotFound(username.to_string())))?;
        debug!(channel_id = peer.channel_id(), "Resolved channel");
        Ok(peer)
    }

    /// Fetch one page of history at `offset`.
    #[instrument(skip(self, peer), fields(channel_id = peer.channel_id()))]
    pub async fn fetch_page(
        &self,
        peer: &InputPeer,
        offset: u32,
        limit: u32,
    ) -> Result<HistoryPage, UpstreamError> {
        let params = json!({
            "peer": peer,
            "add_offset": offset,
            "limit": limit,
        });
        let result = self.caller.call("messages.getHistory", &params).await?;
        decode("messages.getHistory", result)
    }

    /// Fetch every page of `window` for the channel named `username`.
    ///
    /// Resolution failures abort the fetch. A page failure ends pagination
    /// and yields a partial [`FetchOutcome`], even when it is the first page.
    /// Every offset of the window is visited otherwise, including those after
    /// a page without messages.
    ///
    /// # Errors
    ///
    /// Returns an error only if the channel cannot be resolved.
    #[instrument(skip(self, window), fields(page_size = window.page_size(), max_offset = window.max_offset()))]
    pub async fn fetch_all(
        &self,
        username: &str,
        window: &FetchWindow,
    ) -> Result<FetchOutcome, UpstreamError> {
        let peer = self.resolve_peer(username).await?;

        let mut records = Vec::new();
        let mut pages_fetched = 0;

        for offset in window.offsets() {
            if pages_fetched > 0 {
                self.caller.sleeper().sleep(self.page_delay).await;
            }

            let page = match self.fetch_page(&peer, offset, window.page_size()).await {
                Ok(page) => page,
                Err(err) => {
                    warn!(offset, error = %err, kept = records.len(), "Page fetch failed, stopping pagination");
                    return Ok(FetchOutcome::partial(records, pages_fetched, err));
                }
            };
            pages_fetched += 1;

            let page_records = page.records();
            debug!(
                offset,
                messages = page.messages.len(),
                kept = page_records.len(),
                "Fetched history page"
            );
            records.extend(page_records);
        }

        info!(records = records.len(), pages_fetched, "Pagination complete");
        Ok(FetchOutcome::complete(records, pages_fetched))
    }
}

fn decode<T: DeserializeOwned>(method: &str, value: JsonValue) -> Result<T, UpstreamError> {
    serde_json::from_value(value).map_err(|e| {
        UpstreamError::new(UpstreamErrorKind::MalformedResponse(format!(
            "{}: {}",
            method, e
        )))
    })
}
