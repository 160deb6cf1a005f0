//! The payment history of an entry with a running balance.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{Entry, EntryId, EntryStore, Payment},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, status_badge,
    },
    navigation::NavBar,
};

/// The state needed for the payment history page.
#[derive(Debug, Clone)]
pub struct PaymentHistoryState {
    /// The ledger the entry belongs to.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for PaymentHistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
        }
    }
}

/// A payment and the balance left after it.
struct HistoryRow<'a> {
    payment: &'a Payment,
    balance_after: f64,
}

/// Pair each payment with the balance remaining once it was applied.
fn running_balance(entry: &Entry) -> Vec<HistoryRow<'_>> {
    entry
        .payments
        .iter()
        .scan(entry.total_amount, |balance, payment| {
            *balance -= payment.amount;

            Some(HistoryRow {
                payment,
                balance_after: *balance,
            })
        })
        .collect()
}

/// Renders the payments of an entry, or a 404 page if it does not exist.
pub async fn get_payment_history_page(
    Path(entry_id): Path<EntryId>,
    State(state): State<PaymentHistoryState>,
) -> Result<Response, Error> {
    let store = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = store.get(&entry_id).ok_or(Error::NotFound)?;

    Ok(payment_history_view(entry).into_response())
}

fn payment_history_view(entry: &Entry) -> Markup {
    let history_url = format_endpoint(endpoints::ENTRY_HISTORY_VIEW, &entry.id);
    let pay_url = format_endpoint(endpoints::PAY_ENTRY_VIEW, &entry.id);
    let ledger_url = format_endpoint(endpoints::LEDGER_VIEW, entry.category.slug());
    let nav_bar = NavBar::new(&history_url).into_html();
    let rows = running_balance(entry);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Payment History" }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (entry.party_name) " · "
                            a href=(ledger_url) class=(LINK_STYLE) { (entry.category.label()) }
                        }
                    }

                    div class="flex items-center gap-4"
                    {
                        (status_badge(entry.status))
                        a href=(pay_url) class=(LINK_STYLE) { "Record Payment" }
                    }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Cheque No." }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Voucher No." }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class="px-6 py-3 text-right" { "Balance" }
                        }
                    }

                    tbody
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (entry.date) }
                            td class=(TABLE_CELL_STYLE) colspan="3" { "Opening amount" }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                (format_currency(entry.total_amount))
                            }
                        }

                        @for row in &rows {
                            tr class=(TABLE_ROW_STYLE) data-payment-row=(row.payment.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (row.payment.date) }
                                td class=(TABLE_CELL_STYLE) { (row.payment.cheque_no) }
                                td class=(TABLE_CELL_STYLE) { (row.payment.voucher_no) }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_currency(row.payment.amount))
                                }
                                td class="px-6 py-4 text-right tabular-nums" data-balance-after
                                {
                                    (format_currency(row.balance_after))
                                }
                            }
                        }

                        @if rows.is_empty() {
                            tr
                            {
                                td
                                    colspan="5"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No payments have been recorded yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Payment History", &[], &content)
}
