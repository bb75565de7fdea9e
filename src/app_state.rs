use std::sync::Arc;
use crate::config::Config;
use crate::services::{SharedEventStore, SyncService};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedEventStore,
    pub sync: SyncService,
    pub config: Arc<Config>,
}
