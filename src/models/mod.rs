//! Shared types: the stored Event and the raw feed record it is built from.

pub mod event;

pub use event::{Event, RawEvent, SellMode};
