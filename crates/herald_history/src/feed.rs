//! A paginator bound to one channel.

use crate::{FetchOutcome, HistoryPaginator};
use herald_core::FetchWindow;
use herald_error::UpstreamError;

/// Something that can produce a fresh set of records.
#[async_trait::async_trait]
pub trait HistorySource: Send + Sync {
    /// Run one full fetch.
    async fn fetch(&self) -> Result<FetchOutcome, UpstreamError>;
}

/// The configured channel and window, fetched through a [`HistoryPaginator`].
#[derive(Debug, Clone)]
pub struct ChannelFeed {
    paginator: HistoryPaginator,
    channel: String,
    window: FetchWindow,
}

impl ChannelFeed {
    /// Bind `paginator` to `channel` and `window`.
    pub fn new(paginator: HistoryPaginator, channel: impl Into<String>, window: FetchWindow) -> Self {
        Self {
            paginator,
            channel: channel.into(),
            window,
        }
    }

    /// Channel username.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait::async_trait]
impl HistorySource for ChannelFeed {
    async fn fetch(&self) -> Result<FetchOutcome, UpstreamError> {
        self.paginator.fetch_all(&self.channel, &self.window).await
    }
}
