//! Shared helpers for the crate's tests.

use std::sync::{Arc, Mutex};

use axum::response::Response;
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    AppState,
    db::initialize,
    import::ImportState,
    month::current_report_year,
    pagination::PaginationConfig,
    record::{FilterComposition, Product, Record, RecordListState},
    stats::StatsState,
};

/// An initialized in-memory database connection.
pub fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

/// A record with placeholder product text.
pub fn test_record(
    id: i64,
    price: f64,
    category: &str,
    sold: bool,
    date_of_sale: Option<Date>,
) -> Record {
    Record {
        id,
        product: Product {
            title: format!("Product {id}"),
            description: String::new(),
            price,
            category: category.to_owned(),
            image: format!("https://example.com/{id}.jpg"),
        },
        sold,
        date_of_sale,
    }
}

/// A sold record with the given title and description, for search tests.
pub fn named_record(
    id: i64,
    title: &str,
    description: &str,
    price: f64,
    date_of_sale: Option<Date>,
) -> Record {
    Record {
        id,
        product: Product {
            title: title.to_owned(),
            description: description.to_owned(),
            price,
            category: "misc".to_owned(),
            image: format!("https://example.com/{id}.jpg"),
        },
        sold: true,
        date_of_sale,
    }
}

/// A date in the current report year, for tests that go through handlers.
pub fn this_year(month: Month, day: u8) -> Date {
    Date::from_calendar_date(current_report_year(), month, day).unwrap()
}

/// A statistics endpoint state over a fresh in-memory database.
pub fn get_test_stats_state() -> StatsState {
    StatsState {
        db_connection: Arc::new(Mutex::new(get_test_connection())),
    }
}

/// A record-listing endpoint state over a fresh in-memory database.
pub fn get_test_list_state() -> RecordListState {
    RecordListState {
        db_connection: Arc::new(Mutex::new(get_test_connection())),
        pagination_config: PaginationConfig::default(),
        filter_composition: FilterComposition::MonthAndSearch,
    }
}

/// An import endpoint state pointed at `feed_url`.
pub fn get_test_import_state(feed_url: &str) -> ImportState {
    ImportState {
        db_connection: Arc::new(Mutex::new(get_test_connection())),
        http_client: reqwest::Client::new(),
        feed_url: feed_url.to_owned(),
        import_lock: Arc::new(tokio::sync::Mutex::new(())),
    }
}

/// A full application state over a fresh in-memory database.
///
/// The feed URL points nowhere; router tests that need a live feed start
/// their own.
pub fn get_test_app_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().unwrap(),
        "http://localhost:9/feed",
        PaginationConfig::default(),
        FilterComposition::MonthAndSearch,
    )
    .unwrap()
}

/// Read a response body back as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
