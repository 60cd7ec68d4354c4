//! Route handler for the import: fetch the feed, replace the store.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    record::{Record, replace_all_records},
};

use super::feed::{fetch_product_feed, record_from_feed_item};

/// The state needed for importing records.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection that holds the record collection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The HTTP client used to fetch the feed.
    pub http_client: reqwest::Client,
    /// The URL of the upstream product feed.
    pub feed_url: String,
    /// Serializes runs of the import.
    pub import_lock: Arc<tokio::sync::Mutex<()>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            feed_url: state.feed_url.clone(),
            import_lock: state.import_lock.clone(),
        }
    }
}

/// Route handler for `GET /init`: pull the upstream feed and replace the
/// entire record collection with its contents.
///
/// Concurrent calls are serialized by the import lock, so two replaces can
/// never interleave. The feed is fetched and mapped in full before the store
/// is touched; any fetch or mapping failure leaves the previous data in
/// place.
pub async fn init_records(State(state): State<ImportState>) -> Response {
    let _import_permit = state.import_lock.lock().await;

    let items = match fetch_product_feed(&state.http_client, &state.feed_url).await {
        Ok(items) => items,
        Err(error) => return error.into_response(),
    };

    let records: Result<Vec<Record>, Error> =
        items.into_iter().map(record_from_feed_item).collect();
    let records = match records {
        Ok(records) => records,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match replace_all_records(&records, &connection) {
        Ok(count) => {
            tracing::info!("replaced the record collection with {count} records");
            (
                StatusCode::OK,
                Json(json!({ "message": "Database initialized successfully" })),
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod init_records_tests {
    use axum::{Router, extract::State, http::StatusCode, routing::get};
    use time::macros::date;

    use crate::{
        record::{count_records, replace_all_records},
        test_utils::{get_test_import_state, json_body, test_record},
    };

    use super::init_records;

    /// Serve `body` from a local HTTP server and return the URL to fetch it.
    async fn serve_feed(body: &'static str) -> String {
        let router = Router::new().route("/feed", get(move || async move { body }));
        serve(router).await
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind feed listener");
        let addr = listener.local_addr().expect("Could not get feed address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Feed server stopped");
        });

        format!("http://{addr}/feed")
    }

    const FEED_BODY: &str = r#"[
        {"id": 1, "title": "Blue Shirt", "price": 329.85, "description": "plain",
         "category": "men's clothing", "image": "https://example.com/1.jpg",
         "sold": true, "dateOfSale": "2021-11-27T20:29:54+05:30"},
        {"id": 2, "title": "Oak Table", "price": 120.0, "description": "solid",
         "category": "furniture", "image": "https://example.com/2.jpg",
         "sold": false, "dateOfSale": null}
    ]"#;

    #[tokio::test]
    async fn imports_the_feed_into_the_store() {
        let feed_url = serve_feed(FEED_BODY).await;
        let state = get_test_import_state(&feed_url);

        let response = init_records(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Database initialized successfully");
        assert_eq!(count_records(&state.db_connection.lock().unwrap()), Ok(2));
    }

    #[tokio::test]
    async fn importing_twice_yields_the_same_record_set() {
        let feed_url = serve_feed(FEED_BODY).await;
        let state = get_test_import_state(&feed_url);

        init_records(State(state.clone())).await;
        init_records(State(state.clone())).await;

        assert_eq!(count_records(&state.db_connection.lock().unwrap()), Ok(2));
    }

    #[tokio::test]
    async fn a_failing_feed_leaves_existing_data_in_place() {
        let router =
            Router::new().route("/feed", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let feed_url = serve(router).await;
        let state = get_test_import_state(&feed_url);

        let existing = vec![test_record(9, 10.0, "a", true, Some(date!(2025 - 01 - 01)))];
        replace_all_records(&existing, &state.db_connection.lock().unwrap())
            .expect("Could not seed records");

        let response = init_records(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("product feed"));
        assert_eq!(count_records(&state.db_connection.lock().unwrap()), Ok(1));
    }

    #[tokio::test]
    async fn a_bad_feed_entry_aborts_the_whole_import() {
        let feed_url = serve_feed(
            r#"[
                {"id": 1, "title": "Blue Shirt", "price": 329.85, "description": "plain",
                 "category": "men's clothing", "image": "https://example.com/1.jpg",
                 "sold": true, "dateOfSale": "2021-11-27T20:29:54+05:30"},
                {"id": 2, "title": "Oak Table", "price": 120.0, "description": "solid",
                 "category": "furniture", "image": "https://example.com/2.jpg",
                 "sold": true, "dateOfSale": "27/11/2021"}
            ]"#,
        )
        .await;
        let state = get_test_import_state(&feed_url);

        let response = init_records(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(count_records(&state.db_connection.lock().unwrap()), Ok(0));
    }
}
