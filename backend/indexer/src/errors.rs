//! Error type shared by the indexer, the store and the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON-RPC error the poll does not retry.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Event parse error: {0}")]
    EventParse(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IndexerError {
    /// Status an API handler reports for this failure. Upstream RPC
    /// trouble is a bad gateway; everything else is on us.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Http(_) | Self::Rpc { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!("Request failed with {status}: {self}");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
