pub mod event_store;
pub mod feed_parser;
pub mod normalizer;
pub mod provider;
pub mod sync;

pub use event_store::{EventStore, InMemoryEventStore, SharedEventStore};
pub use provider::{FeedSource, FileFeedSource, HttpFeedSource};
pub use sync::{SyncReport, SyncService, SyncStatus};
