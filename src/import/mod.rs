//! The one-shot import that seeds the record collection.
//!
//! The import pulls the upstream JSON feed, maps every entry into a store
//! record, and performs a full replace of the collection. It is the only
//! write path in the application.

mod endpoint;
mod feed;

pub use endpoint::{ImportState, init_records};
pub use feed::{DEFAULT_FEED_URL, FeedItem, fetch_product_feed, record_from_feed_item};
