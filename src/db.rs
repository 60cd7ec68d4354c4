//! Database schema initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, record::create_record_table};

/// Create the application's tables if they do not exist yet.
///
/// Runs inside an exclusive transaction so two processes pointed at the same
/// database file cannot interleave schema creation.
///
/// # Errors
/// Returns an error if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_record_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("Could not initialize schema");
        initialize(&conn).expect("Could not re-initialize schema");
    }
}
