//! Provider feed decoding.
//!
//! Expected layout:
//!
//! ```xml
//! <events>
//!   <event>
//!     <id>291</id>
//!     <name>Camela en concierto</name>
//!     <start_date>2021-06-30T21:00:00</start_date>
//!     <end_date>2021-06-30T22:00:00</end_date>
//!     <sell_mode>online</sell_mode>
//!   </event>
//! </events>
//! ```
//!
//! Fields may also be given as attributes on `<event>`. A child element wins
//! over an attribute of the same name.

use roxmltree::{Document, Node};

use crate::error::ParseError;
use crate::models::RawEvent;

const ROOT_TAG: &str = "events";
const EVENT_TAG: &str = "event";

/// Decode a raw payload into feed records. Either every record or an error.
pub fn parse(payload: &[u8]) -> Result<Vec<RawEvent>, ParseError> {
    let text = std::str::from_utf8(payload)?;
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    if root.tag_name().name() != ROOT_TAG {
        return Err(ParseError::UnexpectedRoot(root.tag_name().name().to_string()));
    }

    let records = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == EVENT_TAG)
        .map(|node| RawEvent {
            id: field(node, "id"),
            name: field(node, "name"),
            start_date: field(node, "start_date"),
            end_date: field(node, "end_date"),
            sell_mode: field(node, "sell_mode"),
        })
        .collect();

    Ok(records)
}

fn field(event: Node<'_, '_>, name: &str) -> Option<String> {
    let non_empty = |v: &str| Some(v.trim()).filter(|v| !v.is_empty()).map(str::to_string);

    event
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| non_empty(n.text().unwrap_or_default()))
        .or_else(|| event.attribute(name).and_then(non_empty))
}
