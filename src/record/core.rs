//! Defines the core data model and database functions for sale records.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The product details attached to a sale record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The display name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price. Never negative.
    pub price: f64,
    /// The category label the product belongs to.
    pub category: String,
    /// An opaque image reference. Stored and returned, never queried.
    pub image: String,
}

/// One sale-or-listing entry of the dataset.
///
/// The `id` is the identifier carried by the upstream feed. It is not
/// guaranteed to be unique beyond a single import generation, so the store
/// keeps its own internal row ID for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The identifier assigned by the upstream feed.
    pub id: i64,
    /// The product being sold or listed.
    pub product: Product,
    /// Whether the product has been sold.
    pub sold: bool,
    /// The day the sale happened. `None` for records never sold.
    pub date_of_sale: Option<Date>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the record table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT
                )",
        (),
    )?;

    // Index used by the month-window filters and the statistics load.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_record_date_of_sale ON record(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// The column list that [map_record_row] expects, in order.
pub(crate) const RECORD_COLUMNS: &str =
    "source_id, title, description, price, category, image, sold, date_of_sale";

/// Map a database row to a [Record].
pub fn map_record_row(row: &Row) -> Result<Record, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        product: Product {
            title: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            category: row.get(4)?,
            image: row.get(5)?,
        },
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

/// Insert a single record into the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if the insert fails.
pub(crate) fn insert_record(record: &Record, connection: &Connection) -> Result<(), Error> {
    connection
        .prepare_cached(
            "INSERT INTO record (source_id, title, description, price, category, image, sold, date_of_sale)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?
        .execute((
            record.id,
            &record.product.title,
            &record.product.description,
            record.product.price,
            &record.product.category,
            &record.product.image,
            record.sold,
            record.date_of_sale,
        ))?;

    Ok(())
}

/// Replace the entire record collection with `records`.
///
/// The delete and the inserts run inside a single SQL transaction: either the
/// new generation of data replaces the old one completely, or the old one is
/// left untouched.
///
/// # Errors
/// This function will return an [Error::SqlError] if the transaction cannot
/// be started or committed, or if any insert fails.
pub fn replace_all_records(records: &[Record], connection: &Connection) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute("DELETE FROM record", ())?;

    for record in records {
        insert_record(record, &tx)?;
    }

    tx.commit()?;

    Ok(records.len())
}

/// Get the total number of records in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
pub fn count_records(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM record;", [], |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })
        .map_err(|error| error.into())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{
        record::{count_records, replace_all_records},
        test_utils::{get_test_connection, test_record},
    };

    #[test]
    fn replace_fills_an_empty_store() {
        let conn = get_test_connection();
        let records = vec![
            test_record(1, 12.99, "electronics", true, Some(date!(2025 - 03 - 15))),
            test_record(2, 45.0, "clothing", false, None),
        ];

        let inserted = replace_all_records(&records, &conn).expect("Could not replace records");

        assert_eq!(inserted, 2);
        assert_eq!(count_records(&conn), Ok(2));
    }

    #[test]
    fn replace_discards_the_previous_generation() {
        let conn = get_test_connection();
        let first = vec![
            test_record(1, 10.0, "a", true, Some(date!(2025 - 01 - 01))),
            test_record(2, 20.0, "b", false, None),
            test_record(3, 30.0, "c", true, Some(date!(2025 - 02 - 01))),
        ];
        replace_all_records(&first, &conn).expect("Could not replace records");

        let second = vec![test_record(9, 99.0, "z", false, None)];
        replace_all_records(&second, &conn).expect("Could not replace records");

        assert_eq!(count_records(&conn), Ok(1));
    }

    #[test]
    fn replace_is_idempotent_in_content() {
        let conn = get_test_connection();
        let records = vec![
            test_record(1, 12.99, "electronics", true, Some(date!(2025 - 03 - 15))),
            test_record(2, 45.0, "clothing", false, None),
        ];

        replace_all_records(&records, &conn).expect("Could not replace records");
        replace_all_records(&records, &conn).expect("Could not replace records");

        assert_eq!(count_records(&conn), Ok(records.len() as u64));
    }

    #[test]
    fn records_round_trip_through_the_store() {
        let conn = get_test_connection();
        let want = test_record(42, 19.99, "home decoration", true, Some(date!(2025 - 06 - 07)));
        replace_all_records(std::slice::from_ref(&want), &conn)
            .expect("Could not replace records");

        let got = conn
            .query_row(
                "SELECT source_id, title, description, price, category, image, sold, date_of_sale FROM record",
                [],
                crate::record::map_record_row,
            )
            .expect("Could not read record back");

        assert_eq!(want, got);
    }

    #[test]
    fn undated_records_keep_a_null_sale_date() {
        let conn = get_test_connection();
        let want = test_record(7, 5.0, "misc", false, None);
        replace_all_records(std::slice::from_ref(&want), &conn)
            .expect("Could not replace records");

        let got = conn
            .query_row(
                "SELECT source_id, title, description, price, category, image, sold, date_of_sale FROM record",
                [],
                crate::record::map_record_row,
            )
            .expect("Could not read record back");

        assert_eq!(got.date_of_sale, None);
    }
}
