//! The table of entries for one category, with stat cards and filters.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{
        core::{Category, Entry, EntryStatus},
        filter::{MonthFilter, SearchMode, StatFilter, View, ViewFilter, filter_view},
        store::EntryStore,
        summary::{StatCounts, StatSummary},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency, status_badge,
    },
    navigation::NavBar,
    timezone::current_local_date,
};

/// The state needed for the ledger page.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
    /// The ledger to display.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            entry_store: state.entry_store.clone(),
        }
    }
}

/// Renders the entries of one category, narrowed down by the query string.
pub async fn get_ledger_page(
    Path(slug): Path<String>,
    State(state): State<LedgerState>,
    Query(filter): Query<ViewFilter>,
) -> Result<Response, Error> {
    let category = Category::from_slug(&slug).ok_or(Error::UnknownCategory(slug))?;
    let today = current_local_date(&state.local_timezone)?;

    let store = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let view = View::Category(category);
    // The stat cards describe every status so clicking one does not change the totals.
    let unfiltered_by_status = filter_view(
        store.entries(),
        view,
        &filter.with_status(StatFilter::All),
        today,
    );
    let stats = StatSummary::from_entries(unfiltered_by_status.iter().copied());
    let counts = StatCounts::from_entries(unfiltered_by_status.iter().copied());

    let rows: Vec<LedgerRow> = filter_view(store.entries(), view, &filter, today)
        .into_iter()
        .map(LedgerRow::new)
        .collect();

    Ok(ledger_view(category, &filter, &stats, &counts, &rows).into_response())
}

/// An entry with the values and links the table displays.
struct LedgerRow<'a> {
    entry: &'a Entry,
    total_paid: f64,
    balance: f64,
    pay_url: String,
    history_url: String,
    confirm_url: Option<String>,
    edit_url: String,
    delete_url: String,
}

impl<'a> LedgerRow<'a> {
    fn new(entry: &'a Entry) -> Self {
        let confirm_url = (entry.category == Category::UnknownOnline
            && entry.status != EntryStatus::Confirmed)
            .then(|| format_endpoint(endpoints::CONFIRM_ENTRY_VIEW, &entry.id));

        Self {
            entry,
            total_paid: entry.total_paid(),
            balance: entry.balance(),
            pay_url: format_endpoint(endpoints::PAY_ENTRY_VIEW, &entry.id),
            history_url: format_endpoint(endpoints::ENTRY_HISTORY_VIEW, &entry.id),
            confirm_url,
            edit_url: format_endpoint(endpoints::EDIT_ENTRY_VIEW, &entry.id),
            delete_url: format!(
                "{}?confirmed=true",
                format_endpoint(endpoints::ENTRY_API, &entry.id)
            ),
        }
    }

    fn delete_message(&self) -> String {
        let party = if self.entry.party_name.is_empty() {
            "this entry"
        } else {
            self.entry.party_name.as_str()
        };

        format!("Are you sure you want to delete the entry for '{party}'? This cannot be undone.")
    }

    fn actions(&self, hx_target: &str, hx_swap: &str) -> Markup {
        html! {
            a href=(self.pay_url) class=(LINK_STYLE) { "Pay" }
            a href=(self.history_url) class=(LINK_STYLE) { "History" }

            @if let Some(confirm_url) = &self.confirm_url {
                a href=(confirm_url) class=(LINK_STYLE) data-confirm-link="true" { "Confirm" }
            }

            (edit_delete_action_links(
                &self.edit_url,
                &self.delete_url,
                &self.delete_message(),
                hx_target,
                hx_swap,
            ))
        }
    }
}

fn filter_url(ledger_url: &str, filter: &ViewFilter) -> String {
    match serde_urlencoded::to_string(filter) {
        Ok(query) => format!("{ledger_url}?{query}"),
        Err(error) => {
            tracing::error!("could not encode filter {filter:?}: {error}");
            ledger_url.to_owned()
        }
    }
}

fn stat_amount(stats: &StatSummary, status: StatFilter) -> f64 {
    match status {
        StatFilter::All => stats.total,
        StatFilter::Paid => stats.paid,
        StatFilter::Pending => stats.pending,
        StatFilter::Overdue => stats.overdue,
    }
}

fn stat_cards_view(
    ledger_url: &str,
    filter: &ViewFilter,
    stats: &StatSummary,
    counts: &StatCounts,
) -> Markup {
    html! {
        div class="grid grid-cols-2 lg:grid-cols-4 gap-4 w-full"
        {
            @for status in StatFilter::ALL {
                @let is_active = status == filter.status;
                @let border = if is_active { "border-blue-500" } else { "border-transparent" };

                a
                    href=(filter_url(ledger_url, &filter.with_status(status)))
                    data-stat=(status.label())
                    aria-current=[is_active.then_some("true")]
                    class={ "block p-4 rounded shadow-sm bg-white dark:bg-gray-800 border " (border) }
                {
                    div class="text-xs uppercase text-gray-500 dark:text-gray-400"
                    {
                        (status.label()) " (" (counts.get(status)) ")"
                    }
                    div class="text-lg font-semibold tabular-nums"
                    {
                        (format_currency(stat_amount(stats, status)))
                    }
                }
            }
        }
    }
}

fn filter_form_view(ledger_url: &str, filter: &ViewFilter) -> Markup {
    html! {
        form method="get" action=(ledger_url) class="flex flex-wrap items-end gap-2 w-full"
        {
            input type="hidden" name="status" value=(filter.status.label().to_lowercase());

            select
                name="month"
                aria-label="Month"
                onchange="this.form.submit()"
                class={ (FORM_TEXT_INPUT_STYLE) " lg:w-auto" }
            {
                @for month in MonthFilter::ALL {
                    option value=(month.as_query_value()) selected[month == filter.month]
                    {
                        (month.label())
                    }
                }
            }

            select
                name="search_by"
                aria-label="Search by"
                class={ (FORM_TEXT_INPUT_STYLE) " lg:w-auto" }
            {
                @for mode in SearchMode::ALL {
                    option value=(mode.as_query_value()) selected[mode == filter.search_by]
                    {
                        (mode.label())
                    }
                }
            }

            input
                type="search"
                name="search"
                placeholder="Search"
                value=(filter.search)
                class={ (FORM_TEXT_INPUT_STYLE) " lg:w-64" };

            button type="submit" class={ (BUTTON_PRIMARY_STYLE) " lg:w-auto" } { "Search" }
        }
    }
}

fn ledger_view(
    category: Category,
    filter: &ViewFilter,
    stats: &StatSummary,
    counts: &StatCounts,
    rows: &[LedgerRow<'_>],
) -> Markup {
    let ledger_url = format_endpoint(endpoints::LEDGER_VIEW, category.slug());
    let new_entry_url = format!("{}?category={}", endpoints::NEW_ENTRY_VIEW, category.slug());
    let nav_bar = NavBar::new(&ledger_url).into_html();

    let table_row = |row: &LedgerRow<'_>| {
        let entry = row.entry;

        html! {
            tr class=(TABLE_ROW_STYLE) data-entry-row=(entry.id)
            {
                td class=(TABLE_CELL_STYLE) { (entry.date) }
                td class=(TABLE_CELL_STYLE) { (entry.ref_no) }
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (entry.party_name)
                    @if let Some(confirmed_by) = &entry.confirmed_by {
                        div class="text-xs text-gray-500" { "Confirmed by " (confirmed_by) }
                    }
                }
                td class=(TABLE_CELL_STYLE) { (entry.bank_name.as_deref().unwrap_or_default()) }
                td class="px-6 py-4 text-right tabular-nums" { (format_currency(entry.total_amount)) }
                td class="px-6 py-4 text-right tabular-nums" { (format_currency(row.total_paid)) }
                td class="px-6 py-4 text-right tabular-nums" data-balance { (format_currency(row.balance)) }
                td class=(TABLE_CELL_STYLE) { (entry.due_date.as_deref().unwrap_or_default()) }
                td class=(TABLE_CELL_STYLE) { (status_badge(entry.status)) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4" { (row.actions("closest tr", "delete")) }
                }
            }
        }
    };

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (category.label()) }

                    a href=(new_entry_url) class=(LINK_STYLE) { "Add Entry" }
                }

                (stat_cards_view(&ledger_url, filter, stats, counts))
                (filter_form_view(&ledger_url, filter))
                (ledger_cards_view(rows, &new_entry_url))

                section class="hidden lg:block w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Ref No." }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Party" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Bank" }
                                th scope="col" class="px-6 py-3 text-right" { "Total" }
                                th scope="col" class="px-6 py-3 text-right" { "Paid" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Due" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="10"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No entries found. Add an entry "
                                        a href=(new_entry_url) class=(LINK_STYLE) { "here" }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base(category.label(), &[], &content)
}

fn ledger_cards_view(rows: &[LedgerRow<'_>], new_entry_url: &str) -> Markup {
    html! {
        ul class="lg:hidden space-y-4 w-full"
        {
            @for row in rows {
                li
                    class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-entry-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div class="text-sm font-semibold text-gray-900 dark:text-white"
                        { (row.entry.party_name) }
                        div class="text-sm tabular-nums text-right text-gray-900 dark:text-white"
                        { (format_currency(row.balance)) }
                    }

                    div class="mt-1 flex items-center justify-between text-xs text-gray-500 dark:text-gray-400"
                    {
                        span
                        {
                            (row.entry.date)
                            @if let Some(bank_name) = &row.entry.bank_name {
                                " · " (bank_name)
                            }
                        }
                        (status_badge(row.entry.status))
                    }

                    div class="mt-2 flex flex-wrap items-center gap-4 text-sm"
                    {
                        (row.actions("closest [data-entry-card='true']", "outerHTML"))
                    }
                }
            }

            @if rows.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No entries found. Add an entry "
                    a href=(new_entry_url) class=(LINK_STYLE) { "here" }
                    "."
                }
            }
        }
    }
}
