//! The page and endpoint for editing entries.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{
        core::{Entry, EntryId},
        form::{EntryForm, EntryFormDefaults, entry_form_fields},
        store::EntryStore,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
};

/// The state needed for editing an entry.
#[derive(Debug, Clone)]
pub struct EditEntryState {
    /// The ledger the entry belongs to.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for EditEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
        }
    }
}

/// Renders the page for editing an entry, or a 404 page if it does not exist.
pub async fn get_edit_entry_page(
    Path(entry_id): Path<EntryId>,
    State(state): State<EditEntryState>,
) -> Result<Response, Error> {
    let store = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = store.get(&entry_id).ok_or(Error::NotFound)?;

    Ok(edit_entry_view(entry).into_response())
}

fn edit_entry_view(entry: &Entry) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_ENTRY_VIEW, &entry.id);
    let update_url = format_endpoint(endpoints::ENTRY_API, &entry.id);
    let nav_bar = NavBar::new(&edit_url).into_html();
    let fields = entry_form_fields(&EntryFormDefaults {
        category: entry.category,
        date: &entry.date,
        entry: Some(entry),
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Entry" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Entry" }
            }
        }
    };

    base("Edit Entry", &[currency_input_styles()], &content)
}

/// Replaces the editable fields of an entry and redirects to the ledger of
/// its, possibly new, category.
///
/// Payments are kept. Editing an entry that does not exist changes nothing.
pub async fn edit_entry_endpoint(
    Path(entry_id): Path<EntryId>,
    State(state): State<EditEntryState>,
    Form(form): Form<EntryForm>,
) -> Response {
    let (category, update) = match form.into_update() {
        Ok(update) => update,
        Err(error) => return error.into_alert_response(),
    };

    let mut store = match state.entry_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match store.edit_entry(&entry_id, update) {
        Ok(()) => (
            HxRedirect(format_endpoint(endpoints::LEDGER_VIEW, category.slug())),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update entry {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}
