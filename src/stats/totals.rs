//! Scalar sale totals for one month.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use time::Month;

use crate::{
    Error,
    month::{current_report_year, month_bounds, parse_report_month, year_start},
    record::get_records_in_range,
};

use super::{StatsQuery, StatsState};

/// The scalar totals of one month's sales.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    /// The summed price of everything sold in the month.
    pub total_sale_amount: f64,
    /// How many records were sold in the month.
    pub total_sold_items: u64,
    /// How many records dated in the month remain unsold.
    pub total_not_sold_items: u64,
}

/// Compute the sale totals for `month` of `year`.
///
/// Loads every dated record from the start of the year through the end of
/// the month in one query, then narrows to the month in memory; the
/// narrowing step is the actual statistics boundary.
///
/// # Errors
/// Returns [Error::SqlError] if the record load fails.
pub fn compute_sale_totals(
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<SaleTotals, Error> {
    let window = month_bounds(year, month);
    let records = get_records_in_range(year_start(year), window.end, connection)?;

    let mut totals = SaleTotals::default();

    for record in records {
        let Some(date_of_sale) = record.date_of_sale else {
            continue;
        };

        if date_of_sale < window.start {
            continue;
        }

        if record.sold {
            totals.total_sale_amount += record.product.price;
            totals.total_sold_items += 1;
        } else {
            totals.total_not_sold_items += 1;
        }
    }

    Ok(totals)
}

/// Route handler for `GET /statistics`: the sale totals for one month of the
/// current year.
pub async fn get_sale_statistics(
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

    match compute_sale_totals(current_report_year(), month, &connection) {
        Ok(totals) => Json(totals).into_response(),
        Err(error) => error.into_response(),
    }
}
