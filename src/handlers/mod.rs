pub mod events;
pub mod sync;

pub use events::{get_events, EventWindow, EventsQuery};
pub use sync::{get_sync_status, SyncStatusResponse};
