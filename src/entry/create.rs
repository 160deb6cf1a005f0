//! The page and endpoint for creating entries.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{
        core::Category,
        form::{EntryForm, EntryFormDefaults, entry_form_fields},
        store::EntryStore,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
    timezone::current_local_date,
};

/// The state needed for the new entry page.
#[derive(Debug, Clone)]
pub struct CreateEntryPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateEntryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The state needed for creating an entry.
#[derive(Debug, Clone)]
pub struct CreateEntryState {
    /// The ledger the entry is added to.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for CreateEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
        }
    }
}

/// The query string of the new entry page.
#[derive(Debug, Default, Deserialize)]
pub struct CreateEntryQuery {
    /// The slug of the category the form starts on.
    pub category: Option<String>,
}

/// Renders the page for creating an entry.
///
/// The category defaults to cheque receivables, an unknown category gives a 404.
pub async fn get_create_entry_page(
    State(state): State<CreateEntryPageState>,
    Query(query): Query<CreateEntryQuery>,
) -> Result<Response, Error> {
    let category = match query.category.as_deref() {
        None | Some("") => Category::ChequeReceivables,
        Some(slug) => {
            Category::from_slug(slug).ok_or_else(|| Error::UnknownCategory(slug.to_owned()))?
        }
    };

    let today = current_local_date(&state.local_timezone)?;

    Ok(create_entry_view(category, today).into_response())
}

fn create_entry_view(category: Category, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ENTRY_VIEW).into_html();
    let today = today.to_string();
    let fields = entry_form_fields(&EntryFormDefaults {
        category,
        date: &today,
        entry: None,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Entry" }

            form
                hx-post=(endpoints::ENTRIES_API)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Entry" }
            }
        }
    };

    base("New Entry", &[currency_input_styles()], &content)
}

/// Adds a new entry and redirects to the ledger of its category.
pub async fn create_entry_endpoint(
    State(state): State<CreateEntryState>,
    Form(form): Form<EntryForm>,
) -> Response {
    let new_entry = match form.into_new_entry() {
        Ok(new_entry) => new_entry,
        Err(error) => return error.into_alert_response(),
    };
    let category = new_entry.category;

    let mut store = match state.entry_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match store.add_entry(new_entry) {
        Ok(entry) => {
            tracing::info!("created entry {} in {}", entry.id, category.label());

            (
                HxRedirect(format_endpoint(endpoints::LEDGER_VIEW, category.slug())),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create entry: {error}");
            error.into_alert_response()
        }
    }
}
