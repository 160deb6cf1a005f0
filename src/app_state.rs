//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    entry::EntryStore,
    insights::{InsightsClient, InsightsConfig},
    timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,

    /// The ledger, loaded from and mirrored to the database.
    pub entry_store: Arc<Mutex<EntryStore>>,

    /// The client for generating AI insights.
    pub insights_client: InsightsClient,
}

impl AppState {
    /// Create a new [AppState] by loading the ledger from a SQLite database connection.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Karachi".
    ///
    /// # Errors
    /// Returns an error if the timezone is invalid, the database cannot be
    /// initialized or the stored ledger is corrupted.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        insights_config: InsightsConfig,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        let entry_store = EntryStore::load(db_connection)?;
        tracing::info!("loaded {} entries", entry_store.entries().len());

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            entry_store: Arc::new(Mutex::new(entry_store)),
            insights_client: InsightsClient::new(insights_config)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{AppState, Error, insights::InsightsConfig};

    #[test]
    fn rejects_invalid_timezone() {
        let connection = Connection::open_in_memory().unwrap();

        let result = AppState::new(connection, "Mars/Olympus_Mons", InsightsConfig::default());

        assert!(matches!(result, Err(Error::InvalidTimezoneError(_))));
    }

    #[test]
    fn loads_empty_ledger() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "Asia/Karachi", InsightsConfig::default()).unwrap();

        assert!(state.entry_store.lock().unwrap().entries().is_empty());
    }
}
