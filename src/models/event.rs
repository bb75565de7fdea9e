use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an event can currently be bought. Only `Online` events are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellMode {
    Online,
    Offline,
}

impl SellMode {
    /// Exact match on the provider's spelling. Anything else is not a sell mode we know.
    pub fn from_feed(value: &str) -> Option<Self> {
        match value {
            "online" => Some(SellMode::Online),
            "offline" => Some(SellMode::Offline),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SellMode::Online => "online",
            SellMode::Offline => "offline",
        }
    }
}

impl fmt::Display for SellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as stored and served. Dates stay in the provider's string format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub sell_mode: SellMode,
}

impl Event {
    /// Containment filter used by every store backing.
    ///
    /// The event's whole window must sit inside `[starts_at, ends_at]`:
    /// `start_date >= starts_at && end_date <= ends_at`. An event that merely
    /// overlaps the requested window is NOT returned.
    ///
    /// Comparison is plain string ordering, not calendar-aware. Dates in the
    /// same zero-padded ISO layout compare correctly; mixed layouts or
    /// timezone suffixes may not.
    pub fn is_within(&self, starts_at: &str, ends_at: &str) -> bool {
        self.start_date.as_str() >= starts_at && self.end_date.as_str() <= ends_at
    }
}

/// One `<event>` element from the provider feed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    pub id: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sell_mode: Option<String>,
}
