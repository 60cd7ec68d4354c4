//! Per-month aggregate views over the record collection.
//!
//! Three independent read-only views, each scoped to one month of the
//! current year: scalar sale totals, a fixed ten-bucket price histogram,
//! and a dynamic category breakdown. A combined endpoint computes all three
//! concurrently and fails as a whole if any one fails.

mod categories;
mod combined;
mod histogram;
mod totals;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::Deserialize;

use crate::AppState;

pub use categories::{count_categories, get_pie_chart};
pub use combined::{CombinedReport, get_combined_data};
pub use histogram::{PriceHistogram, compute_price_histogram, get_bar_chart};
pub use totals::{SaleTotals, compute_sale_totals, get_sale_statistics};

/// The state needed for the statistics endpoints.
#[derive(Debug, Clone)]
pub struct StatsState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw query parameters shared by the statistics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// The month to report on, 1 through 12.
    pub month: Option<String>,
}
