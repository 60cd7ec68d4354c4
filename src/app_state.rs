//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig, record::FilterComposition};

/// How long an upstream feed request may take before it is abandoned.
const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The HTTP client used to fetch the upstream product feed.
    pub http_client: reqwest::Client,

    /// The URL of the upstream product feed.
    pub feed_url: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// How the listing combines its month window with the search term.
    pub filter_composition: FilterComposition,

    /// Serializes runs of the import so two full replaces never interleave.
    pub import_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the table for the
    /// record collection. The connection is closed when the last clone of the
    /// state is dropped.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the HTTP
    /// client cannot be built.
    pub fn new(
        db_connection: Connection,
        feed_url: &str,
        pagination_config: PaginationConfig,
        filter_composition: FilterComposition,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let http_client = reqwest::Client::builder()
            .timeout(FEED_TIMEOUT)
            .build()
            .map_err(|error| Error::FeedFetch(error.to_string()))?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            http_client,
            feed_url: feed_url.to_owned(),
            pagination_config,
            filter_composition,
            import_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }
}
