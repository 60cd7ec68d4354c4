//! The fixed ten-bucket price histogram for one month.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Serialize, Serializer, ser::SerializeMap};
use time::Month;

use crate::{
    Error,
    month::{current_report_year, parse_report_month},
    record::get_records_in_month,
};

use super::{StatsQuery, StatsState};

/// The response labels of the ten price buckets, in ascending price order.
const BUCKET_LABELS: [&str; 10] = [
    "0-100",
    "101-200",
    "201-300",
    "301-400",
    "401-500",
    "501-600",
    "601-700",
    "701-800",
    "801-900",
    "901-above",
];

/// The index of the bucket that `price` falls into.
///
/// The buckets partition `[0, ∞)`: the first covers prices up to and
/// including 100, each following bucket covers the next 100 exclusive of its
/// lower bound, and the last is unbounded above 900.
fn bucket_index(price: f64) -> usize {
    match price {
        p if p <= 100.0 => 0,
        p if p <= 200.0 => 1,
        p if p <= 300.0 => 2,
        p if p <= 400.0 => 3,
        p if p <= 500.0 => 4,
        p if p <= 600.0 => 5,
        p if p <= 700.0 => 6,
        p if p <= 800.0 => 7,
        p if p <= 900.0 => 8,
        _ => 9,
    }
}

/// Per-bucket record counts for one month.
///
/// Serializes as a JSON object with one entry per bucket in ascending price
/// order; buckets with no records report `0` and are never omitted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [u64; 10],
}

impl PriceHistogram {
    /// Count each price into its bucket.
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        let mut histogram = Self::default();

        for price in prices {
            histogram.counts[bucket_index(price)] += 1;
        }

        histogram
    }

    /// The count of the bucket named `label`, or `None` for an unknown label.
    pub fn count(&self, label: &str) -> Option<u64> {
        BUCKET_LABELS
            .iter()
            .position(|&bucket_label| bucket_label == label)
            .map(|index| self.counts[index])
    }

    /// The number of records counted across all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for PriceHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BUCKET_LABELS.len()))?;

        for (label, count) in BUCKET_LABELS.iter().zip(self.counts) {
            map.serialize_entry(label, &count)?;
        }

        map.end()
    }
}

/// Compute the price histogram for `month` of `year`.
///
/// Only records with a sale date inside the month count; the window is
/// half-open so a record dated on the first of the next month is excluded.
///
/// # Errors
/// Returns [Error::SqlError] if the record load fails.
pub fn compute_price_histogram(
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<PriceHistogram, Error> {
    let records = get_records_in_month(year, month, connection)?;

    Ok(PriceHistogram::from_prices(
        records.iter().map(|record| record.product.price),
    ))
}

/// Route handler for `GET /bar-chart`: the price histogram for one month of
/// the current year.
pub async fn get_bar_chart(
    State(state): State<StatsState>,
    Query(query): Query<StatsQuery>,
) -> Response {
    let month = match parse_report_month(query.month.as_deref()) {
        Ok(month) => month,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match compute_price_histogram(current_report_year(), month, &connection) {
        Ok(histogram) => Json(histogram).into_response(),
        Err(error) => error.into_response(),
    }
}
