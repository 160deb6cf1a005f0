//! Identifying the sender of an unknown online transfer.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{
        core::{Category, Entry, EntryId},
        store::EntryStore,
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
};

/// The state needed for confirming an unknown transfer.
#[derive(Debug, Clone)]
pub struct ConfirmEntryState {
    /// The ledger the transfer belongs to.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for ConfirmEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
        }
    }
}

/// The form data for confirming an unknown transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmForm {
    /// The identified sender, becomes the entry's party name.
    pub customer_name: String,
    /// Who identified the sender.
    pub confirmed_by: String,
}

/// Renders the page for confirming an unknown transfer.
pub async fn get_confirm_entry_page(
    Path(entry_id): Path<EntryId>,
    State(state): State<ConfirmEntryState>,
) -> Result<Response, Error> {
    let store = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = store.get(&entry_id).ok_or(Error::NotFound)?;

    Ok(confirm_entry_view(entry).into_response())
}

fn confirm_entry_view(entry: &Entry) -> Markup {
    let confirm_url = format_endpoint(endpoints::CONFIRM_ENTRY_VIEW, &entry.id);
    let confirm_api = format_endpoint(endpoints::ENTRY_CONFIRM_API, &entry.id);
    let nav_bar = NavBar::new(&confirm_url).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-2" { "Confirm Transfer" }

            p class="mb-4 text-gray-600 dark:text-gray-400"
            {
                (format_currency(entry.total_amount)) " received on " (entry.date)
                @if let Some(bank_name) = &entry.bank_name {
                    " via " (bank_name)
                }
            }

            form
                hx-post=(confirm_api)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                div
                {
                    label for="customer_name" class=(FORM_LABEL_STYLE) { "Customer Name" }

                    input
                        name="customer_name"
                        id="customer_name"
                        type="text"
                        placeholder="Who sent the transfer"
                        value=(entry.party_name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="confirmed_by" class=(FORM_LABEL_STYLE) { "Confirmed By" }

                    input
                        name="confirmed_by"
                        id="confirmed_by"
                        type="text"
                        placeholder="Your name"
                        value=[entry.confirmed_by.as_deref()]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Confirm" }
            }
        }
    };

    base("Confirm Transfer", &[], &content)
}

/// Records the sender of an unknown transfer and redirects to the unknown
/// online ledger.
pub async fn confirm_entry_endpoint(
    Path(entry_id): Path<EntryId>,
    State(state): State<ConfirmEntryState>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let mut store = match state.entry_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match store.confirm_unknown(&entry_id, form.customer_name.trim(), form.confirmed_by.trim()) {
        Ok(()) => (
            HxRedirect(format_endpoint(
                endpoints::LEDGER_VIEW,
                Category::UnknownOnline.slug(),
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not confirm entry {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error, endpoints,
        entry::{
            confirm::{ConfirmEntryState, ConfirmForm, confirm_entry_endpoint, get_confirm_entry_page},
            core::{Category, EntryStatus, NewEntry},
        },
        test_utils::{
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_hx_redirect,
            assert_required_form_input, assert_valid_html, must_add_entry, must_create_test_store,
            must_get_form, parse_html_document,
        },
    };

    fn get_test_state() -> ConfirmEntryState {
        ConfirmEntryState {
            entry_store: must_create_test_store(),
        }
    }

    #[tokio::test]
    async fn page_has_confirm_form() {
        let state = get_test_state();
        let entry = must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::UnknownOnline, "2025-03-01", "", 1500.0),
        );

        let response = get_confirm_entry_page(Path(entry.id.clone()), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::ENTRY_CONFIRM_API, &entry.id),
            "hx-post",
        );
        assert_required_form_input(&form, "customer_name", "text");
        assert_required_form_input(&form, "confirmed_by", "text");
        assert_form_submit_button_with_text(&form, "Confirm");
    }

    #[tokio::test]
    async fn page_for_missing_entry_is_not_found() {
        let result =
            get_confirm_entry_page(Path("missing".to_owned()), State(get_test_state())).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn confirm_sets_party_and_status() {
        let state = get_test_state();
        let entry = must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::UnknownOnline, "2025-03-01", "", 1500.0),
        );
        let form = ConfirmForm {
            customer_name: " Acme Traders ".to_owned(),
            confirmed_by: "Ali".to_owned(),
        };

        let response = confirm_entry_endpoint(Path(entry.id.clone()), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/ledger/unknown-online");
        let store = state.entry_store.lock().unwrap();
        let confirmed = store.get(&entry.id).unwrap();
        assert_eq!(confirmed.party_name, "Acme Traders");
        assert_eq!(confirmed.confirmed_by.as_deref(), Some("Ali"));
        assert_eq!(confirmed.status, EntryStatus::Confirmed);
    }
}
