//! The combined report: all three aggregate views in one response.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::Month;

use crate::{
    Error,
    month::{current_report_year, parse_report_month},
};

use super::{
    PriceHistogram, SaleTotals, StatsQuery, StatsState, compute_price_histogram,
    compute_sale_totals, count_categories,
};

/// The three aggregate views for one month, computed together.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// The scalar sale totals.
    pub statistics: SaleTotals,
    /// The ten-bucket price histogram.
    pub bar_chart_data: PriceHistogram,
    /// The per-category record counts.
    pub pie_chart_data: BTreeMap<String, u64>,
}

/// Route handler for `GET /combined-data`: compute the totals, histogram,
/// and category breakdown concurrently and return them together.
///
/// The three computations are joined fail-fast; if any one fails, the whole
/// request fails with that error and no partial report is returned.
pub async fn get_combined_data(
    State(state): State<StatsState>,
    Query(query): Query<StatsQuery>,
) -> Response {
    let month = match parse_report_month(query.month.as_deref()) {
        Ok(month) => month,
        Err(error) => return error.into_response(),
    };
    let year = current_report_year();

    let report = tokio::try_join!(
        load_totals(&state, year, month),
        load_histogram(&state, year, month),
        load_categories(&state, year, month),
    );

    match report {
        Ok((statistics, bar_chart_data, pie_chart_data)) => Json(CombinedReport {
            statistics,
            bar_chart_data,
            pie_chart_data,
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}

async fn load_totals(state: &StatsState, year: i32, month: Month) -> Result<SaleTotals, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    compute_sale_totals(year, month, &connection)
}

async fn load_histogram(
    state: &StatsState,
    year: i32,
    month: Month,
) -> Result<PriceHistogram, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    compute_price_histogram(year, month, &connection)
}

async fn load_categories(
    state: &StatsState,
    year: i32,
    month: Month,
) -> Result<BTreeMap<String, u64>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    count_categories(year, month, &connection)
}
