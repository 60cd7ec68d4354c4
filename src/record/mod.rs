//! Sale records for the dashboard.
//!
//! This module contains everything related to the record collection:
//! - The `Record` and `Product` models and their database schema
//! - The full-replace write path used by the import
//! - Query construction for the filtered, paginated listing
//! - The route handler for the listing endpoint

mod core;
mod list_endpoint;
mod query;

pub use core::{Product, Record, create_record_table, map_record_row, replace_all_records};
pub use list_endpoint::{RecordListQuery, RecordListState, RecordPage, get_records};
pub use query::FilterComposition;

pub(crate) use query::{get_records_in_month, get_records_in_range};

#[cfg(test)]
pub use core::count_records;
