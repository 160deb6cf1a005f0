//! Defines the endpoint for deleting an entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    entry::{core::EntryId, store::EntryStore},
};

/// The state needed to delete an entry.
#[derive(Debug, Clone)]
pub struct DeleteEntryState {
    /// The ledger the entry is removed from.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for DeleteEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
        }
    }
}

/// Whether the user agreed to the deletion.
///
/// The delete buttons ask with `hx-confirm` and only then send `confirmed=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteEntryQuery {
    #[serde(default)]
    pub confirmed: bool,
}

/// A route handler for deleting an entry, responds with an alert.
pub async fn delete_entry_endpoint(
    State(state): State<DeleteEntryState>,
    Path(entry_id): Path<EntryId>,
    Query(query): Query<DeleteEntryQuery>,
) -> Response {
    let mut store = match state.entry_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let exists = store.get(&entry_id).is_some();

    match store.delete_entry(&entry_id, |_| query.confirmed) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(true) => {
            tracing::info!("deleted entry {entry_id}");

            Alert::SuccessSimple {
                message: "Entry deleted successfully".to_owned(),
            }
            .into_response()
        }
        Ok(false) if !exists => Error::DeleteMissingEntry.into_alert_response(),
        Ok(false) => (
            StatusCode::BAD_REQUEST,
            Alert::ErrorSimple {
                message: "Deletion was not confirmed".to_owned(),
            },
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete entry {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}
