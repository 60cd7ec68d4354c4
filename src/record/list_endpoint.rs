//! Route handler for the paginated, filtered record listing.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::{current_report_year, parse_report_month},
    pagination::{PaginationConfig, page_count, page_offset},
};

use super::{
    core::Record,
    query::{FilterComposition, RecordFilter, count_matching_records, get_record_page},
};

/// The state needed for listing records.
#[derive(Debug, Clone)]
pub struct RecordListState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Page defaults applied when the request leaves them out.
    pub pagination_config: PaginationConfig,
    /// How the month window and search term combine.
    pub filter_composition: FilterComposition,
}

impl FromRef<AppState> for RecordListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            filter_composition: state.filter_composition,
        }
    }
}

/// The raw query parameters of a record-listing request.
///
/// Everything is kept as text so validation failures surface as the same
/// JSON error shape as every other bad parameter.
#[derive(Debug, Default, Deserialize)]
pub struct RecordListQuery {
    /// The month of the window, 1 through 12.
    pub month: Option<String>,
    /// The 1-based page to return.
    pub page: Option<String>,
    /// The number of records per page.
    pub limit: Option<String>,
    /// The free-text or numeric search term.
    pub search: Option<String>,
}

/// One page of matching records plus the pagination bookkeeping the client
/// needs to render its controls.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    /// The records of the requested page, in insertion order.
    pub data: Vec<Record>,
    /// The page that was returned.
    pub current_page: u64,
    /// The total number of pages for the filtered set.
    pub total_pages: u64,
    /// The total number of records matching the filter.
    pub total_count: u64,
}

/// Route handler for `GET /`: the paginated, filtered record listing.
pub async fn get_records(
    State(state): State<RecordListState>,
    Query(query): Query<RecordListQuery>,
) -> Response {
    let month = match parse_report_month(query.month.as_deref()) {
        Ok(month) => month,
        Err(error) => return error.into_response(),
    };

    let page = match parse_positive(
        query.page.as_deref(),
        state.pagination_config.default_page,
        "page",
    ) {
        Ok(page) => page,
        Err(error) => return error.into_response(),
    };

    let limit = match parse_positive(
        query.limit.as_deref(),
        state.pagination_config.default_page_size,
        "limit",
    ) {
        Ok(limit) => limit,
        Err(error) => return error.into_response(),
    };

    let search = query.search.as_deref().unwrap_or_default();
    let filter = RecordFilter {
        year: current_report_year(),
        month,
        search,
        composition: state.filter_composition,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let page_result = count_matching_records(&filter, &connection).and_then(|total_count| {
        let data = get_record_page(&filter, page_offset(page, limit), limit, &connection)?;

        Ok(RecordPage {
            data,
            current_page: page,
            total_pages: page_count(total_count, limit),
            total_count,
        })
    });

    match page_result {
        Ok(record_page) => Json(record_page).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Parse an optional 1-based numeric query parameter.
///
/// # Errors
/// Returns [Error::InvalidQuery] if the value is present but not a whole
/// number of at least 1.
fn parse_positive(raw: Option<&str>, default: u64, name: &str) -> Result<u64, Error> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: u64 = raw.trim().parse().map_err(|_| {
        Error::InvalidQuery(format!("{name} must be a whole number, got \"{raw}\""))
    })?;

    if value == 0 {
        return Err(Error::InvalidQuery(format!("{name} must be at least 1")));
    }

    Ok(value)
}
