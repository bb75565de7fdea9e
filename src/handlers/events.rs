use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crate::error::QueryParamError;
use crate::models::Event;
use crate::AppState;

#[derive(Debug, Default)]
pub struct EventsQuery {
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

/// Validated bounds of an events query.
#[derive(Debug, PartialEq, Eq)]
pub struct EventWindow {
    pub starts_at: String,
    pub ends_at: String,
}

impl EventsQuery {
    /// Pick the bounds out of raw query pairs. A repeated key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "starts_at" => &mut query.starts_at,
                "ends_at" => &mut query.ends_at,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// Both bounds are required; an empty value counts as missing.
    pub fn into_window(self) -> Result<EventWindow, QueryParamError> {
        let starts_at = self.starts_at.filter(|v| !v.is_empty());
        let ends_at = self.ends_at.filter(|v| !v.is_empty());

        match (starts_at, ends_at) {
            (Some(starts_at), Some(ends_at)) => Ok(EventWindow { starts_at, ends_at }),
            (starts_at, ends_at) => {
                let mut missing = Vec::new();
                if starts_at.is_none() {
                    missing.push("starts_at");
                }
                if ends_at.is_none() {
                    missing.push("ends_at");
                }
                Err(QueryParamError { missing })
            }
        }
    }
}

/// GET /events?starts_at=..&ends_at=..
///
/// Returns online events whose whole window lies inside the requested one
/// (containment, not overlap). Order is unspecified.
pub async fn get_events(
    Query(pairs): Query<Vec<(String, String)>>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>, Response> {
    let window = EventsQuery::from_pairs(pairs)
        .into_window()
        .map_err(IntoResponse::into_response)?;

    let events = state
        .store
        .query(&window.starts_at, &window.ends_at)
        .await
        .map_err(|e| {
            tracing::error!("Error querying events: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Database error"})),
            )
                .into_response()
        })?;

    Ok(Json(events))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(starts_at: Option<&str>, ends_at: Option<&str>) -> EventsQuery {
        EventsQuery {
            starts_at: starts_at.map(str::to_string),
            ends_at: ends_at.map(str::to_string),
        }
    }

    #[test]
    fn both_bounds_make_a_window() {
        let window = query(Some("2024-01-01"), Some("2024-01-31")).into_window().unwrap();
        assert_eq!(
            window,
            EventWindow {
                starts_at: "2024-01-01".to_string(),
                ends_at: "2024-01-31".to_string(),
            }
        );
    }

    #[test]
    fn reports_which_bounds_are_missing() {
        let err = query(Some("2024-01-01"), None).into_window().unwrap_err();
        assert_eq!(err.missing, vec!["ends_at"]);

        let err = query(Some(""), Some("")).into_window().unwrap_err();
        assert_eq!(err.missing, vec!["starts_at", "ends_at"]);
    }

    #[test]
    fn repeated_key_keeps_first_value() {
        let pairs = vec![
            ("starts_at".to_string(), "2024-01-01".to_string()),
            ("page".to_string(), "2".to_string()),
            ("starts_at".to_string(), "2024-01-02".to_string()),
            ("ends_at".to_string(), "2024-01-31".to_string()),
        ];

        let query = EventsQuery::from_pairs(pairs);
        assert_eq!(query.starts_at.as_deref(), Some("2024-01-01"));
        assert_eq!(query.ends_at.as_deref(), Some("2024-01-31"));
    }
}
