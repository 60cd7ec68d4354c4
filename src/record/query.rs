//! Database query construction for the record listing.
//!
//! A listing request combines two constraints: a month window over
//! `date_of_sale` (undated records always match) and a free-text/numeric
//! search over the product fields. How the two combine is a deliberate
//! configuration choice, see [FilterComposition].

use rusqlite::{Connection, params_from_iter, types::Value};
use time::{Date, Month};

use crate::{
    Error,
    month::{month_bounds, next_month_start},
};

use super::core::{RECORD_COLUMNS, Record, map_record_row};

/// How the month window and the search term combine into one predicate.
///
/// The original service wrote both constraints under the same query key, so
/// the search constraint silently replaced the month window whenever both
/// were present. `MonthAndSearch` applies the intended conjunction;
/// `SearchOnly` reproduces the legacy overwrite for clients that depend
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterComposition {
    /// Records must match the month window AND the search term.
    MonthAndSearch,
    /// Records must match the search term only; the month window is dropped.
    SearchOnly,
}

/// The constraints of one record-listing request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordFilter<'a> {
    /// The year the month window is computed against.
    pub year: i32,
    /// The month of the window.
    pub month: Month,
    /// The raw search term. Empty matches every record.
    pub search: &'a str,
    /// How the month window and search term combine.
    pub composition: FilterComposition,
}

/// Build the WHERE clause and its positional parameters for `filter`.
fn filter_clause(filter: &RecordFilter) -> (String, Vec<Value>) {
    let month_clause = "(date_of_sale >= ? AND date_of_sale < ?) OR date_of_sale IS NULL";
    let window_start = month_bounds(filter.year, filter.month).start;
    let window_end = next_month_start(filter.year, filter.month);

    let pattern = format!("%{}%", escape_like_pattern(filter.search));
    let mut search_clause =
        String::from("title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\'");
    let mut search_params = vec![Value::Text(pattern.clone()), Value::Text(pattern)];

    // A numeric search term additionally matches the price exactly.
    if let Ok(price) = filter.search.trim().parse::<f64>() {
        if price.is_finite() {
            search_clause.push_str(" OR price = ?");
            search_params.push(Value::Real(price));
        }
    }

    match filter.composition {
        FilterComposition::MonthAndSearch => {
            let mut params = vec![
                Value::Text(window_start.to_string()),
                Value::Text(window_end.to_string()),
            ];
            params.extend(search_params);

            (format!("({month_clause}) AND ({search_clause})"), params)
        }
        FilterComposition::SearchOnly => (search_clause, search_params),
    }
}

/// Escape the SQL LIKE wildcards in a raw search term.
fn escape_like_pattern(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Get one page of the records matching `filter`, in insertion order.
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or executed.
pub(crate) fn get_record_page(
    filter: &RecordFilter,
    offset: u64,
    limit: u64,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    let (clause, mut params) = filter_clause(filter);
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));

    let query = format!(
        "SELECT {RECORD_COLUMNS} FROM record WHERE {clause} ORDER BY id ASC LIMIT ? OFFSET ?"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_record_row)?
        .map(|record_result| record_result.map_err(Error::SqlError))
        .collect()
}

/// Count every record matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or executed.
pub(crate) fn count_matching_records(
    filter: &RecordFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let (clause, params) = filter_clause(filter);
    let query = format!("SELECT COUNT(id) FROM record WHERE {clause}");

    connection
        .prepare(&query)?
        .query_row(params_from_iter(params), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })
        .map_err(|error| error.into())
}

/// Get every dated record with `date_of_sale` in `[start, end]` (inclusive).
///
/// Records without a sale date never match.
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or executed.
pub(crate) fn get_records_in_range(
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    let query = format!(
        "SELECT {RECORD_COLUMNS} FROM record WHERE date_of_sale BETWEEN ?1 AND ?2 ORDER BY id ASC"
    );

    connection
        .prepare(&query)?
        .query_map([start.to_string(), end.to_string()], map_record_row)?
        .map(|record_result| record_result.map_err(Error::SqlError))
        .collect()
}

/// Get every dated record with `date_of_sale` inside `month` of `year`
/// (half-open, up to but excluding the first day of the next month).
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or executed.
pub(crate) fn get_records_in_month(
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    let start = month_bounds(year, month).start;
    let end = next_month_start(year, month);

    let query = format!(
        "SELECT {RECORD_COLUMNS} FROM record WHERE date_of_sale >= ?1 AND date_of_sale < ?2 ORDER BY id ASC"
    );

    connection
        .prepare(&query)?
        .query_map([start.to_string(), end.to_string()], map_record_row)?
        .map(|record_result| record_result.map_err(Error::SqlError))
        .collect()
}
