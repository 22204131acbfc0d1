//! Channel history retrieval.
//!
//! [`HistoryPaginator`] resolves a channel username once, then walks a
//! [`FetchWindow`](herald_core::FetchWindow) of offsets through the
//! rate-limited caller. Each page's messages are joined to the users returned
//! in the same page; messages with empty text or an unknown sender are
//! dropped. A failing page ends the run early and the records gathered so far
//! are kept, reported through [`FetchOutcome::completed`].
//!
//! [`ChannelFeed`] binds a paginator to one channel and window and implements
//! [`HistorySource`], the seam the cache refreshes through.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod feed;
mod paginator;
mod wire;

pub use feed::{ChannelFeed, HistorySource};
pub use paginator::{DEFAULT_PAGE_DELAY, FetchOutcome, HistoryPaginator};
pub use wire::{
    FromId, HistoryPage, InputPeer, PeerId, ResolvedPeer, WireChat, WireMessage, WireUser,
};
