//! Event repository contract and its in-memory backing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::Event;

/// Keyed collection of online events, shared between the sync job and request handlers.
///
/// Implementations must replace a record as a whole: a concurrent reader sees
/// either the old or the new version of an event, never a mix.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert the event, or overwrite every field of the stored one with the same id.
    async fn upsert(&self, event: Event) -> Result<(), StoreError>;

    /// Upsert a whole sync batch.
    async fn upsert_many(&self, events: Vec<Event>) -> Result<(), StoreError>;

    /// Every stored event whose window is contained in `[starts_at, ends_at]`.
    /// See [`Event::is_within`] for the exact (string-ordered) semantics.
    async fn query(&self, starts_at: &str, ends_at: &str) -> Result<Vec<Event>, StoreError>;

    async fn len(&self) -> Result<usize, StoreError>;
}

pub type SharedEventStore = Arc<dyn EventStore>;

/// Events held in process memory for the lifetime of the server.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<String, Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Event> {
        self.events.read().await.get(id).cloned()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn upsert(&self, event: Event) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        events.insert(event.id.clone(), event);
        Ok(())
    }

    async fn upsert_many(&self, batch: Vec<Event>) -> Result<(), StoreError> {
        // One lock for the batch: readers see the snapshot before or after this cycle
        let mut events = self.events.write().await;
        for event in batch {
            events.insert(event.id.clone(), event);
        }
        Ok(())
    }

    async fn query(&self, starts_at: &str, ends_at: &str) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        Ok(events
            .values()
            .filter(|e| e.is_within(starts_at, ends_at))
            .cloned()
            .collect())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.events.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SellMode;

    fn event(id: &str, name: &str, start: &str, end: &str) -> Event {
        Event {
            id: id.to_string(),
            name: name.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            sell_mode: SellMode::Online,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_id() {
        let store = InMemoryEventStore::new();
        store.upsert(event("E1", "A", "2024-01-10", "2024-01-12")).await.unwrap();
        store.upsert(event("E1", "B", "2024-01-11", "2024-01-13")).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
        let stored = store.get("E1").await.unwrap();
        assert_eq!(stored.name, "B");
        assert_eq!(stored.start_date, "2024-01-11");
    }

    #[tokio::test]
    async fn query_uses_containment() {
        let store = InMemoryEventStore::new();
        store.upsert(event("1", "Concert", "2024-01-10", "2024-01-12")).await.unwrap();

        let hits = store.query("2024-01-01", "2024-01-31").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        assert!(store.query("2024-01-11", "2024-01-31").await.unwrap().is_empty());
        assert!(store.query("2024-01-01", "2024-01-11").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_many_keeps_ids_missing_from_later_batches() {
        let store = InMemoryEventStore::new();
        store
            .upsert_many(vec![
                event("1", "One", "2024-01-01", "2024-01-02"),
                event("2", "Two", "2024-01-03", "2024-01-04"),
            ])
            .await
            .unwrap();
        store
            .upsert_many(vec![event("2", "Two again", "2024-01-03", "2024-01-04")])
            .await
            .unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        assert_eq!(store.get("1").await.unwrap().name, "One");
        assert_eq!(store.get("2").await.unwrap().name, "Two again");
    }
}
