//! The per-category record counts for one month.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::Month;

use crate::{
    Error,
    month::{current_report_year, month_bounds, parse_report_month, year_start},
    record::get_records_in_range,
};

use super::{StatsQuery, StatsState};

/// Count the records of every category encountered from the start of the
/// year through the end of `month`.
///
/// The window deliberately spans the year up to the month end, matching the
/// totals view, and there is no fixed category list; only categories with at
/// least one record appear. Undated records are never counted.
///
/// # Errors
/// Returns [Error::SqlError] if the record load fails.
pub fn count_categories(
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<BTreeMap<String, u64>, Error> {
    let window = month_bounds(year, month);
    let records = get_records_in_range(year_start(year), window.end, connection)?;

    let mut counts = BTreeMap::new();

    for record in records {
        *counts.entry(record.product.category).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Route handler for `GET /pie-chart`: the category breakdown for one month
/// of the current year.
pub async fn get_pie_chart(
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

    match count_categories(current_report_year(), month, &connection) {
        Ok(counts) => Json(counts).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod count_categories_tests {
    use std::collections::BTreeMap;

    use time::{Month, macros::date};

    use crate::{record::replace_all_records, test_utils::{get_test_connection, test_record}};

    use super::count_categories;

    #[test]
    fn groups_by_category_across_the_year_to_date() {
        let conn = get_test_connection();
        let records = vec![
            test_record(1, 10.0, "electronics", true, Some(date!(2025 - 01 - 15))),
            test_record(2, 10.0, "electronics", false, Some(date!(2025 - 03 - 02))),
            test_record(3, 10.0, "clothing", true, Some(date!(2025 - 03 - 20))),
            test_record(4, 10.0, "furniture", true, Some(date!(2025 - 04 - 01))),
            test_record(5, 10.0, "clothing", false, None),
        ];
        replace_all_records(&records, &conn).expect("Could not replace records");

        let got = count_categories(2025, Month::March, &conn)
            .expect("Could not count categories");

        let want = BTreeMap::from([
            ("electronics".to_owned(), 2),
            ("clothing".to_owned(), 1),
        ]);
        assert_eq!(got, want);
    }

    #[test]
    fn an_empty_store_yields_an_empty_mapping() {
        let conn = get_test_connection();

        let got = count_categories(2025, Month::March, &conn)
            .expect("Could not count categories");

        assert!(got.is_empty());
    }
}
