//! Salesboard is a web dashboard for browsing a product-sales dataset.
//!
//! This library provides a JSON REST API over a SQLite-backed record store:
//! a paginated, filterable record listing, per-month sale statistics, a
//! ten-bucket price histogram, a category breakdown, and a combined report
//! that joins all three. A one-shot import endpoint pulls the upstream
//! product feed and fully replaces the store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod import;
mod logging;
mod month;
mod pagination;
mod record;
mod routing;
mod stats;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use import::DEFAULT_FEED_URL;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use record::FilterComposition;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month query parameter was missing, non-numeric, or outside 1..=12.
    #[error("invalid month parameter: {0}")]
    InvalidMonth(String),

    /// A query parameter other than the month could not be used, e.g. a zero
    /// page number or a non-numeric limit.
    #[error("invalid query parameter: {0}")]
    InvalidQuery(String),

    /// The upstream product feed could not be fetched or decoded.
    ///
    /// The import never touches the record store when this occurs, so the
    /// previous data generation stays in place.
    #[error("could not fetch the product feed: {0}")]
    FeedFetch(String),

    /// An entry in the upstream feed could not be turned into a record.
    ///
    /// Carries the source item ID and a description of the bad field. The
    /// whole import is abandoned; partial feeds are never written.
    #[error("feed item {0} is invalid: {1}")]
    InvalidFeedItem(i64, String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self {
            Error::InvalidMonth(_) | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::FeedFetch(_)
            | Error::InvalidFeedItem(_, _)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
