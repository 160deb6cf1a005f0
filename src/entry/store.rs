//! The in-memory entry collection and its mirror in the database.

use rusqlite::Connection;

use crate::{
    Error,
    db::{get_value, initialize, set_value},
    entry::core::{Entry, EntryStatus, EntryUpdate, NewEntry, NewPayment, new_id},
};

/// The key the serialized entry collection is stored under.
pub const ENTRIES_STORAGE_KEY: &str = "parchi_pro_v11";

/// Owns the ordered entry collection.
///
/// Every mutation overwrites the stored collection in full, so the database
/// always holds the result of the last successful mutation.
#[derive(Debug)]
pub struct EntryStore {
    entries: Vec<Entry>,
    connection: Connection,
}

impl EntryStore {
    /// Load the collection persisted in `connection`.
    ///
    /// The schema is created if needed. A database without a stored
    /// collection gives an empty store.
    ///
    /// # Errors
    /// Returns [Error::CorruptedStorage] if the stored collection is not
    /// valid JSON, or an SQL error.
    pub fn load(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        let entries = match get_value(ENTRIES_STORAGE_KEY, &connection)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|error| Error::CorruptedStorage(error.to_string()))?,
            None => Vec::new(),
        };

        Ok(Self {
            entries,
            connection,
        })
    }

    /// Every entry in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The entry with `id`, if there is one.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Append a new entry with a fresh id and no payments.
    ///
    /// No validation is done on the amount, dates or names.
    ///
    /// # Errors
    /// Returns an error if the collection could not be persisted.
    pub fn add_entry(&mut self, new_entry: NewEntry) -> Result<&Entry, Error> {
        let entry = new_entry.into_entry(new_id());
        tracing::debug!("adding entry {} for \"{}\"", entry.id, entry.party_name);
        self.entries.push(entry);
        self.persist()?;

        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    /// Shallow merge `update` onto the entry with `id`.
    ///
    /// Does nothing to the collection if there is no such entry.
    ///
    /// # Errors
    /// Returns an error if the collection could not be persisted.
    pub fn edit_entry(&mut self, id: &str, update: EntryUpdate) -> Result<(), Error> {
        if let Some(entry) = self.find_mut(id) {
            update.apply_to(entry);
        } else {
            tracing::debug!("ignoring edit of missing entry {id}");
        }

        self.persist()
    }

    /// Remove the entry with `id` if `confirm` approves it.
    ///
    /// `confirm` is only asked when the entry exists. Returns whether an
    /// entry was removed.
    ///
    /// # Errors
    /// Returns an error if the collection could not be persisted.
    pub fn delete_entry(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&Entry) -> bool,
    ) -> Result<bool, Error> {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return Ok(false);
        };

        if !confirm(&self.entries[index]) {
            tracing::debug!("deletion of entry {id} was not confirmed");
            return Ok(false);
        }

        self.entries.remove(index);
        self.persist()?;

        Ok(true)
    }

    /// Append a payment to the entry with `entry_id`.
    ///
    /// The status becomes [EntryStatus::Paid] once the payments cover the
    /// total amount, otherwise the status is left as it is. Does nothing to
    /// the collection if there is no such entry.
    ///
    /// # Errors
    /// Returns an error if the collection could not be persisted.
    pub fn record_payment(&mut self, entry_id: &str, payment: NewPayment) -> Result<(), Error> {
        if let Some(entry) = self.find_mut(entry_id) {
            entry.payments.push(payment.into_payment(new_id()));

            if entry.total_paid() >= entry.total_amount {
                entry.status = EntryStatus::Paid;
            }
        } else {
            tracing::debug!("ignoring payment for missing entry {entry_id}");
        }

        self.persist()
    }

    /// Record who sent an unknown online transfer and mark it confirmed.
    ///
    /// Does nothing to the collection if there is no such entry.
    ///
    /// # Errors
    /// Returns an error if the collection could not be persisted.
    pub fn confirm_unknown(
        &mut self,
        entry_id: &str,
        customer_name: &str,
        confirmed_by: &str,
    ) -> Result<(), Error> {
        if let Some(entry) = self.find_mut(entry_id) {
            entry.party_name = customer_name.to_owned();
            entry.confirmed_by = Some(confirmed_by.to_owned());
            entry.status = EntryStatus::Confirmed;
        } else {
            tracing::debug!("ignoring confirmation of missing entry {entry_id}");
        }

        self.persist()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    fn persist(&self) -> Result<(), Error> {
        let json = serde_json::to_string(&self.entries)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        set_value(ENTRIES_STORAGE_KEY, &json, &self.connection)
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::{get_value, initialize, set_value},
        entry::{
            core::{Category, EntryStatus, EntryUpdate, NewEntry, NewPayment},
            store::{ENTRIES_STORAGE_KEY, EntryStore},
        },
    };

    fn get_test_store() -> EntryStore {
        EntryStore::load(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn stored_json(store: &EntryStore) -> String {
        get_value(ENTRIES_STORAGE_KEY, &store.connection)
            .unwrap()
            .expect("entries were not persisted")
    }

    #[track_caller]
    fn assert_persisted(store: &EntryStore) {
        let want = serde_json::to_string(store.entries()).unwrap();
        assert_eq!(stored_json(store), want);
    }

    fn acme() -> NewEntry {
        NewEntry::new(Category::ChequeReceivables, "2025-03-10", "Acme", 1000.0)
    }

    #[test]
    fn empty_database_gives_empty_store() {
        let store = get_test_store();

        assert!(store.entries().is_empty());
    }

    #[test]
    fn add_entry_defaults() {
        let mut store = get_test_store();

        let entry = store.add_entry(acme()).unwrap().clone();

        assert!(!entry.id.is_empty());
        assert!(entry.payments.is_empty());
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.party_name, "Acme");
        assert_eq!(store.entries(), &[entry]);
        assert_persisted(&store);
    }

    #[test]
    fn add_entry_keeps_supplied_status() {
        let mut store = get_test_store();

        let entry = store.add_entry(acme().status(EntryStatus::Active)).unwrap();

        assert_eq!(entry.status, EntryStatus::Active);
    }

    #[test]
    fn add_entry_mints_unique_ids_and_appends() {
        let mut store = get_test_store();

        let first = store.add_entry(acme()).unwrap().id.clone();
        let second = store.add_entry(acme()).unwrap().id.clone();

        assert_ne!(first, second);
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    }

    #[test]
    fn add_entry_does_not_validate() {
        let mut store = get_test_store();

        let entry = store
            .add_entry(NewEntry::new(Category::ChequePayables, "", "", -5.0))
            .unwrap();

        assert_eq!(entry.total_amount, -5.0);
    }

    #[test]
    fn edit_entry_merges_supplied_fields() {
        let mut store = get_test_store();
        let id = store.add_entry(acme().bank_name("HBL")).unwrap().id.clone();

        store
            .edit_entry(
                &id,
                EntryUpdate {
                    party_name: Some("Acme Traders".to_owned()),
                    total_amount: Some(1500.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.party_name, "Acme Traders");
        assert_eq!(entry.total_amount, 1500.0);
        assert_eq!(entry.bank_name.as_deref(), Some("HBL"));
        assert_eq!(entry.date, "2025-03-10");
        assert_persisted(&store);
    }

    #[test]
    fn edit_entry_can_clear_optional_field() {
        let mut store = get_test_store();
        let id = store.add_entry(acme().bank_name("HBL")).unwrap().id.clone();

        store
            .edit_entry(
                &id,
                EntryUpdate {
                    bank_name: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.get(&id).unwrap().bank_name, None);
    }

    #[test]
    fn edit_missing_entry_is_a_no_op() {
        let mut store = get_test_store();
        store.add_entry(acme()).unwrap();
        let before = store.entries().to_vec();

        store
            .edit_entry(
                "missing",
                EntryUpdate {
                    party_name: Some("Someone".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn delete_with_confirmation_removes_entry() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();
        let kept = store.add_entry(acme()).unwrap().id.clone();

        let removed = store.delete_entry(&id, |_| true).unwrap();

        assert!(removed);
        assert!(store.get(&id).is_none());
        assert!(store.get(&kept).is_some());
        assert_persisted(&store);
    }

    #[test]
    fn delete_without_confirmation_keeps_entry() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();
        let before = stored_json(&store);

        let removed = store.delete_entry(&id, |_| false).unwrap();

        assert!(!removed);
        assert!(store.get(&id).is_some());
        assert_eq!(stored_json(&store), before);
    }

    #[test]
    fn delete_asks_about_the_matching_entry() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();
        let mut asked_about = None;

        store
            .delete_entry(&id, |entry| {
                asked_about = Some(entry.id.clone());
                true
            })
            .unwrap();

        assert_eq!(asked_about, Some(id));
    }

    #[test]
    fn delete_missing_entry_does_not_ask() {
        let mut store = get_test_store();
        store.add_entry(acme()).unwrap();
        let mut asked = false;

        let removed = store
            .delete_entry("missing", |_| {
                asked = true;
                true
            })
            .unwrap();

        assert!(!removed);
        assert!(!asked);
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn partial_payment_keeps_status() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();

        store
            .record_payment(&id, NewPayment::new("2025-03-11", 400.0))
            .unwrap();

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.payments.len(), 1);
        assert_eq!(entry.payments[0].amount, 400.0);
        assert!(!entry.payments[0].id.is_empty());
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.balance(), 600.0);
        assert_persisted(&store);
    }

    #[test]
    fn payment_covering_total_marks_paid() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();

        store
            .record_payment(&id, NewPayment::new("2025-03-11", 400.0))
            .unwrap();
        store
            .record_payment(&id, NewPayment::new("2025-03-12", 600.0))
            .unwrap();

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.status, EntryStatus::Paid);
        assert_eq!(entry.balance(), 0.0);
        let dates: Vec<&str> = entry.payments.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-11", "2025-03-12"]);
    }

    #[test]
    fn overpayment_marks_paid_with_negative_balance() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();

        store
            .record_payment(&id, NewPayment::new("2025-03-11", 1200.0))
            .unwrap();

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.status, EntryStatus::Paid);
        assert_eq!(entry.balance(), -200.0);
    }

    #[test]
    fn payment_for_missing_entry_is_a_no_op() {
        let mut store = get_test_store();
        store.add_entry(acme()).unwrap();
        let before = store.entries().to_vec();

        store
            .record_payment("missing", NewPayment::new("2025-03-11", 10.0))
            .unwrap();

        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn confirm_unknown_sets_name_and_status() {
        let mut store = get_test_store();
        let id = store
            .add_entry(NewEntry::new(Category::UnknownOnline, "2025-03-10", "", 75.0))
            .unwrap()
            .id
            .clone();

        store.confirm_unknown(&id, "Bolan Foods", "Ali").unwrap();

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.party_name, "Bolan Foods");
        assert_eq!(entry.confirmed_by.as_deref(), Some("Ali"));
        assert_eq!(entry.status, EntryStatus::Confirmed);
        assert_persisted(&store);
    }

    #[test]
    fn confirm_unknown_is_not_restricted_by_category() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();

        store.confirm_unknown(&id, "Acme Ltd", "Sara").unwrap();

        assert_eq!(store.get(&id).unwrap().status, EntryStatus::Confirmed);
    }

    #[test]
    fn confirm_missing_entry_is_a_no_op() {
        let mut store = get_test_store();
        store.add_entry(acme()).unwrap();
        let before = store.entries().to_vec();

        store.confirm_unknown("missing", "Someone", "Ali").unwrap();

        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn reload_restores_collection() {
        let mut store = get_test_store();
        let id = store.add_entry(acme()).unwrap().id.clone();
        store
            .record_payment(&id, NewPayment::new("2025-03-11", 250.0))
            .unwrap();
        let want = store.entries().to_vec();

        let reloaded = EntryStore::load(store.connection).unwrap();

        assert_eq!(reloaded.entries(), want.as_slice());
    }

    #[test]
    fn corrupted_storage_is_an_error() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        set_value(ENTRIES_STORAGE_KEY, "{not json", &connection).unwrap();

        let result = EntryStore::load(connection);

        assert!(matches!(result, Err(Error::CorruptedStorage(_))));
    }

    #[test]
    fn loads_browser_export() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let json = r#"[{"id":"1","category":"Long Term Payables","date":"2025-01-01",
            "refNo":"","partyName":"Landlord","desc":"rent","totalAmount":50000,
            "status":"Active","payments":[]}]"#;
        set_value(ENTRIES_STORAGE_KEY, json, &connection).unwrap();

        let store = EntryStore::load(connection).unwrap();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].category, Category::LongTermPayables);
    }
}
