//! Error types for the sync pipeline and the query API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Upstream fetch failed. The cycle is abandoned and the next tick retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider responded with status {0}")]
    Status(u16),

    #[error("could not read feed file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Feed payload is not the XML structure we expect.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("feed is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("feed is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unexpected root element <{0}>, expected <events>")]
    UnexpectedRoot(String),
}

/// A single feed record could not become an Event. Never fatal to a cycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Why a sync cycle was abandoned.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `starts_at` or `ends_at` was not supplied.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Missing required parameters")]
pub struct QueryParamError {
    pub missing: Vec<&'static str>,
}

impl IntoResponse for QueryParamError {
    fn into_response(self) -> Response {
        tracing::debug!("Rejecting events query, missing {:?}", self.missing);
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": self.to_string()})),
        )
            .into_response()
    }
}
