//! The page and endpoint for recording a payment against an entry.

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
use time::Date;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{Entry, EntryId, EntryStore, NewPayment},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        currency_input_styles, format_currency, status_badge,
    },
    navigation::NavBar,
    timezone::current_local_date,
};

/// The state needed for the payment page and endpoint.
#[derive(Debug, Clone)]
pub struct PaymentState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
    /// The ledger the entry belongs to.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for PaymentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            entry_store: state.entry_store.clone(),
        }
    }
}

/// The form data for a payment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentForm {
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub cheque_no: String,
    #[serde(default)]
    pub voucher_no: String,
}

impl From<PaymentForm> for NewPayment {
    fn from(form: PaymentForm) -> Self {
        NewPayment {
            date: form.date,
            amount: form.amount,
            cheque_no: form.cheque_no.trim().to_owned(),
            voucher_no: form.voucher_no.trim().to_owned(),
        }
    }
}

/// Renders the payment form for an entry, or a 404 page if it does not exist.
pub async fn get_pay_entry_page(
    Path(entry_id): Path<EntryId>,
    State(state): State<PaymentState>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let store = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = store.get(&entry_id).ok_or(Error::NotFound)?;

    Ok(pay_entry_view(entry, today).into_response())
}

fn pay_entry_view(entry: &Entry, today: Date) -> Markup {
    let pay_url = format_endpoint(endpoints::PAY_ENTRY_VIEW, &entry.id);
    let payments_api = format_endpoint(endpoints::ENTRY_PAYMENTS_API, &entry.id);
    let nav_bar = NavBar::new(&pay_url).into_html();
    let balance = entry.balance();
    let suggested_amount = balance.max(0.0).to_string();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-2" { "Record Payment" }

            dl class="w-full max-w-md mb-4 grid grid-cols-2 gap-1 text-sm"
            {
                dt class="text-gray-500 dark:text-gray-400" { "Party" }
                dd { (entry.party_name) }
                dt class="text-gray-500 dark:text-gray-400" { "Total" }
                dd class="tabular-nums" { (format_currency(entry.total_amount)) }
                dt class="text-gray-500 dark:text-gray-400" { "Current Balance" }
                dd class="tabular-nums font-semibold" data-current-balance
                {
                    (format_currency(balance))
                }
                dt class="text-gray-500 dark:text-gray-400" { "Status" }
                dd { (status_badge(entry.status)) }
            }

            form
                hx-post=(payments_api)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        value=(today.to_string())
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="any"
                            min="0.01"
                            value=(suggested_amount)
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div class="grid grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="cheque_no" class=(FORM_LABEL_STYLE) { "Cheque No." }

                        input
                            name="cheque_no"
                            id="cheque_no"
                            type="text"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="voucher_no" class=(FORM_LABEL_STYLE) { "Voucher No." }

                        input
                            name="voucher_no"
                            id="voucher_no"
                            type="text"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Record Payment" }
            }
        }
    };

    base("Record Payment", &[currency_input_styles()], &content)
}

/// Records a payment and redirects to the ledger of the entry.
///
/// A payment for an entry that does not exist changes nothing and
/// redirects to the dashboard.
pub async fn record_payment_endpoint(
    Path(entry_id): Path<EntryId>,
    State(state): State<PaymentState>,
    Form(form): Form<PaymentForm>,
) -> Response {
    let mut store = match state.entry_store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let redirect_url = store.get(&entry_id).map_or_else(
        || endpoints::DASHBOARD_VIEW.to_owned(),
        |entry| format_endpoint(endpoints::LEDGER_VIEW, entry.category.slug()),
    );

    match store.record_payment(&entry_id, form.into()) {
        Ok(()) => (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("could not record payment for entry {entry_id}: {error}");
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
    use scraper::Selector;

    use crate::{
        Error, endpoints,
        entry::{Category, EntryStatus, NewEntry, NewPayment},
        payment::pay::{PaymentForm, PaymentState, get_pay_entry_page, record_payment_endpoint},
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_hx_redirect, assert_required_form_input, assert_valid_html, must_add_entry,
            must_create_test_store, must_get_form, parse_html_document,
        },
    };

    fn get_test_state() -> PaymentState {
        PaymentState {
            local_timezone: "Asia/Karachi".to_owned(),
            entry_store: must_create_test_store(),
        }
    }

    fn payment_form(amount: f64) -> PaymentForm {
        PaymentForm {
            date: "2025-03-10".to_owned(),
            amount,
            cheque_no: " 0042 ".to_owned(),
            voucher_no: String::new(),
        }
    }

    #[tokio::test]
    async fn page_shows_current_balance() {
        let state = get_test_state();
        let entry = must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::LongTermPayables, "2025-03-01", "Landlord", 1000.0),
        );
        state
            .entry_store
            .lock()
            .unwrap()
            .record_payment(&entry.id, NewPayment::new("2025-03-02", 250.0))
            .unwrap();

        let response = get_pay_entry_page(Path(entry.id.clone()), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let balance: String = html
            .select(&Selector::parse("[data-current-balance]").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(balance.trim(), "Rs 750.00");

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::ENTRY_PAYMENTS_API, &entry.id),
            "hx-post",
        );
        assert_required_form_input(&form, "date", "date");
        assert_form_input_with_value(&form, "amount", "number", "750");
        assert_form_submit_button_with_text(&form, "Record Payment");
    }

    #[tokio::test]
    async fn page_for_missing_entry_is_not_found() {
        let result = get_pay_entry_page(Path("missing".to_owned()), State(get_test_state())).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn partial_payment_keeps_status() {
        let state = get_test_state();
        let entry = must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::ChequePayables, "2025-03-01", "Acme", 1000.0)
                .status(EntryStatus::Overdue),
        );

        let response = record_payment_endpoint(
            Path(entry.id.clone()),
            State(state.clone()),
            Form(payment_form(400.0)),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/ledger/cheque-payables");
        let store = state.entry_store.lock().unwrap();
        let paid = store.get(&entry.id).unwrap();
        assert_eq!(paid.status, EntryStatus::Overdue);
        assert_eq!(paid.balance(), 600.0);
        assert_eq!(paid.payments[0].cheque_no, "0042");
    }

    #[tokio::test]
    async fn full_payment_marks_paid() {
        let state = get_test_state();
        let entry = must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::ChequePayables, "2025-03-01", "Acme", 1000.0),
        );

        record_payment_endpoint(
            Path(entry.id.clone()),
            State(state.clone()),
            Form(payment_form(1000.0)),
        )
        .await;

        let store = state.entry_store.lock().unwrap();
        assert_eq!(store.get(&entry.id).unwrap().status, EntryStatus::Paid);
    }

    #[tokio::test]
    async fn payment_for_missing_entry_redirects_to_dashboard() {
        let state = get_test_state();

        let response = record_payment_endpoint(
            Path("missing".to_owned()),
            State(state.clone()),
            Form(payment_form(10.0)),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(state.entry_store.lock().unwrap().entries().is_empty());
    }
}
