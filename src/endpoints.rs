//! The API endpoints URIs.

/// The paginated, filtered record listing.
pub const RECORDS: &str = "/";
/// Triggers the import: fetch the upstream feed and replace the store.
pub const INIT: &str = "/init";
/// Scalar sale totals for one month.
pub const STATISTICS: &str = "/statistics";
/// The ten-bucket price histogram for one month.
pub const BAR_CHART: &str = "/bar-chart";
/// The category breakdown for one month.
pub const PIE_CHART: &str = "/pie-chart";
/// All three aggregates in one response.
pub const COMBINED_DATA: &str = "/combined-data";
