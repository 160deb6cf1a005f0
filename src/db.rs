//! The SQLite schema and the key/value slot the ledger is persisted to.

use rusqlite::{Connection, OptionalExtension, params};

use crate::Error;

/// Create all tables the application needs.
///
/// Safe to call on an existing database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_key_value_table(connection)?;

    Ok(())
}

fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the value stored under `key`, or `None` if nothing has been stored.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn get_value(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .query_row(
            "SELECT value FROM key_value WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Store `value` under `key`, replacing any previous value.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn set_value(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO key_value (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::db::{get_value, initialize, set_value};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn initialize_twice_succeeds() {
        let connection = get_test_connection();

        assert!(initialize(&connection).is_ok());
    }

    #[test]
    fn missing_key_is_none() {
        let connection = get_test_connection();

        assert_eq!(get_value("foo", &connection), Ok(None));
    }

    #[test]
    fn set_then_get() {
        let connection = get_test_connection();

        set_value("foo", "[1]", &connection).unwrap();

        assert_eq!(get_value("foo", &connection), Ok(Some("[1]".to_owned())));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let connection = get_test_connection();
        set_value("foo", "first", &connection).unwrap();

        set_value("foo", "second", &connection).unwrap();

        assert_eq!(
            get_value("foo", &connection),
            Ok(Some("second".to_owned()))
        );
        let rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM key_value", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
