//! Core data types for Herald.
//!
//! - [`MessageRecord`]: one channel message joined with its sender
//! - [`CacheSnapshot`]: an immutable generation of fetched records
//! - [`FetchWindow`]: the offset pagination schedule
//! - [`Clock`]: source of "now" for staleness decisions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod record;
mod snapshot;
mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::MessageRecord;
pub use snapshot::CacheSnapshot;
pub use window::FetchWindow;
