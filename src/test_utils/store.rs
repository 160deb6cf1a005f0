use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::entry::{Entry, EntryStore, NewEntry};

/// An empty entry store backed by an in-memory database.
pub(crate) fn must_create_test_store() -> Arc<Mutex<EntryStore>> {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let store = EntryStore::load(connection).expect("Could not load entry store");

    Arc::new(Mutex::new(store))
}

/// Add `new_entry` to `store` and return a copy of the stored entry.
#[track_caller]
pub(crate) fn must_add_entry(store: &Arc<Mutex<EntryStore>>, new_entry: NewEntry) -> Entry {
    store
        .lock()
        .unwrap()
        .add_entry(new_entry)
        .expect("Could not add test entry")
        .clone()
}
