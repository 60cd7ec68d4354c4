//! Fetching and decoding the upstream product feed.

use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    record::{Product, Record},
};

/// The product feed the import pulls when no other URL is configured.
pub const DEFAULT_FEED_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// One entry of the upstream feed, as published.
///
/// The feed is flat; [record_from_feed_item] folds the product fields into
/// the nested shape the store uses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// The feed's identifier for the entry.
    pub id: i64,
    /// The product title.
    pub title: String,
    /// The listed price.
    pub price: f64,
    /// The product description.
    pub description: String,
    /// The category label.
    pub category: String,
    /// An opaque image URL.
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// The sale timestamp, RFC 3339, or null/absent for unsold listings.
    #[serde(default)]
    pub date_of_sale: Option<String>,
}

/// Fetch and decode the product feed at `url`.
///
/// # Errors
/// Returns [Error::FeedFetch] if the request fails, the server responds with
/// a non-success status, or the body is not a JSON array of feed items.
pub async fn fetch_product_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<FeedItem>, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::FeedFetch(error.to_string()))?;

    response
        .json()
        .await
        .map_err(|error| Error::FeedFetch(error.to_string()))
}

/// Turn one feed entry into a store record.
///
/// The sale timestamp is reduced to its calendar date; the time of day and
/// UTC offset play no part in any filter.
///
/// # Errors
/// Returns [Error::InvalidFeedItem] if the price is negative or not a number,
/// or if the sale timestamp cannot be parsed.
pub fn record_from_feed_item(item: FeedItem) -> Result<Record, Error> {
    if item.price < 0.0 || !item.price.is_finite() {
        return Err(Error::InvalidFeedItem(
            item.id,
            format!("price {} is not a non-negative number", item.price),
        ));
    }

    let date_of_sale = match &item.date_of_sale {
        None => None,
        Some(raw) => {
            let timestamp = OffsetDateTime::parse(raw, &Rfc3339).map_err(|error| {
                Error::InvalidFeedItem(item.id, format!("could not parse dateOfSale \"{raw}\": {error}"))
            })?;

            Some(timestamp.date())
        }
    };

    Ok(Record {
        id: item.id,
        product: Product {
            title: item.title,
            description: item.description,
            price: item.price,
            category: item.category,
            image: item.image,
        },
        sold: item.sold,
        date_of_sale,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::{FeedItem, record_from_feed_item};

    fn sample_item() -> FeedItem {
        FeedItem {
            id: 1,
            title: "Blue Shirt".to_owned(),
            price: 329.85,
            description: "A plain blue shirt".to_owned(),
            category: "men's clothing".to_owned(),
            image: "https://example.com/shirt.jpg".to_owned(),
            sold: true,
            date_of_sale: Some("2021-11-27T20:29:54+05:30".to_owned()),
        }
    }

    #[test]
    fn decodes_the_published_feed_shape() {
        let json = r#"{
            "id": 1,
            "title": "Blue Shirt",
            "price": 329.85,
            "description": "A plain blue shirt",
            "category": "men's clothing",
            "image": "https://example.com/shirt.jpg",
            "sold": true,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;

        let item: FeedItem = serde_json::from_str(json).expect("Could not decode feed item");

        assert_eq!(item, sample_item());
    }

    #[test]
    fn maps_feed_fields_into_the_record_shape() {
        let record = record_from_feed_item(sample_item()).expect("Could not map feed item");

        assert_eq!(record.id, 1);
        assert_eq!(record.product.title, "Blue Shirt");
        assert_eq!(record.product.price, 329.85);
        assert_eq!(record.product.category, "men's clothing");
        assert!(record.sold);
        assert_eq!(record.date_of_sale, Some(date!(2021 - 11 - 27)));
    }

    #[test]
    fn keeps_missing_sale_dates_as_none() {
        let item = FeedItem {
            date_of_sale: None,
            sold: false,
            ..sample_item()
        };

        let record = record_from_feed_item(item).expect("Could not map feed item");

        assert_eq!(record.date_of_sale, None);
    }

    #[test]
    fn rejects_an_unparseable_sale_date() {
        let item = FeedItem {
            date_of_sale: Some("27/11/2021".to_owned()),
            ..sample_item()
        };

        let result = record_from_feed_item(item);

        assert!(matches!(result, Err(Error::InvalidFeedItem(1, _))));
    }

    #[test]
    fn rejects_a_negative_price() {
        let item = FeedItem {
            price: -1.0,
            ..sample_item()
        };

        let result = record_from_feed_item(item);

        assert!(matches!(result, Err(Error::InvalidFeedItem(1, _))));
    }
}
