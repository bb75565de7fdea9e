use crate::error::ValidationError;
use crate::models::{Event, RawEvent, SellMode};

/// Result of normalizing one feed snapshot.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub events: Vec<Event>,
    pub skipped_offline: usize,
    pub rejected: usize,
}

/// Turn a feed record into a storable Event.
///
/// `Ok(None)` means the record is valid but not on sale online and is dropped.
pub fn normalize(raw: RawEvent) -> Result<Option<Event>, ValidationError> {
    let id = required(raw.id, "id")?;
    let name = required(raw.name, "name")?;
    let start_date = required(raw.start_date, "start_date")?;
    let end_date = required(raw.end_date, "end_date")?;
    let sell_mode = required(raw.sell_mode, "sell_mode")?;

    if SellMode::from_feed(&sell_mode) != Some(SellMode::Online) {
        return Ok(None);
    }

    Ok(Some(Event {
        id,
        name,
        start_date,
        end_date,
        sell_mode: SellMode::Online,
    }))
}

/// Normalize every record; a bad record is logged and skipped.
pub fn normalize_batch(records: Vec<RawEvent>) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, raw) in records.into_iter().enumerate() {
        let id = raw.id.clone();
        match normalize(raw) {
            Ok(Some(event)) => batch.events.push(event),
            Ok(None) => batch.skipped_offline += 1,
            Err(e) => {
                tracing::warn!(
                    "Skipping feed record #{} (id={}): {}",
                    index,
                    id.as_deref().unwrap_or("?"),
                    e
                );
                batch.rejected += 1;
            }
        }
    }

    batch
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}
