//! Card components for the dashboard: the net position and one card per ledger.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    entry::{CategorySummary, OutstandingTotals},
    html::{LINK_STYLE, format_currency, format_currency_rounded},
};

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// The share of `total` covered by `paid`, as a percentage.
fn paid_percentage(paid: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        paid / total * 100.0
    }
}

/// Renders the receivable, payable and net outstanding totals.
pub(super) fn totals_view(totals: &OutstandingTotals) -> Markup {
    let net = totals.net();
    let net_style = if net < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-3 gap-4 mb-6"
        {
            div class="bg-white dark:bg-gray-800 rounded-lg p-4 shadow-md" data-total="receivable"
            {
                div class="text-sm text-gray-600 dark:text-gray-400" { "To Receive" }
                div class="text-2xl font-bold tabular-nums" { (format_currency(totals.receivable)) }
            }

            div class="bg-white dark:bg-gray-800 rounded-lg p-4 shadow-md" data-total="payable"
            {
                div class="text-sm text-gray-600 dark:text-gray-400" { "To Pay" }
                div class="text-2xl font-bold tabular-nums" { (format_currency(totals.payable)) }
            }

            div class="bg-white dark:bg-gray-800 rounded-lg p-4 shadow-md" data-total="net"
            {
                div class="text-sm text-gray-600 dark:text-gray-400" { "Net Position" }
                div class={ "text-2xl font-bold tabular-nums " (net_style) } { (format_currency(net)) }
            }
        }
    }
}

/// Renders a grid with one card per category.
pub(super) fn category_cards_view(summaries: &[CategorySummary]) -> Markup {
    html! {
        section class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Ledgers" }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4"
            {
                @for summary in summaries {
                    (category_card(summary))
                }
            }
        }
    }
}

/// Renders a single card summarising a category.
fn category_card(summary: &CategorySummary) -> Markup {
    let ledger_url = format_endpoint(endpoints::LEDGER_VIEW, summary.category.slug());
    let stats = &summary.stats;
    let paid_percentage = paid_percentage(stats.paid, stats.total);

    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md
                   hover:shadow-lg transition-shadow flex flex-col justify-between"
            data-category=(summary.category.slug())
            aria-label=(format!(
                "{}: {} outstanding of {}, {}% paid",
                summary.category.label(),
                format_currency_rounded(stats.outstanding()),
                format_currency_rounded(stats.total),
                format_percentage(paid_percentage),
            ))
        {
            div
            {
                h4 class="text-lg font-semibold mb-3 truncate" { (summary.category.label()) }

                div class="text-3xl font-bold mb-1 tabular-nums" data-outstanding
                {
                    (format_currency(stats.outstanding()))
                }

                div class="text-sm text-gray-600 dark:text-gray-400 mb-2"
                {
                    (format_currency(stats.paid)) " paid of " (format_currency(stats.total))
                }

                (progress_bar(paid_percentage))
            }

            div class="mt-3 flex items-center justify-between text-sm"
            {
                span class="text-gray-600 dark:text-gray-400"
                {
                    (summary.counts.all) " entries"
                    @if summary.counts.overdue > 0 {
                        ", "
                        span class="font-medium text-red-600 dark:text-red-400"
                        {
                            (summary.counts.overdue) " overdue"
                        }
                    }
                }

                a href=(ledger_url) class=(LINK_STYLE) { "View" }
            }
        }
    }
}

/// Renders a horizontal progress bar showing the paid percentage.
fn progress_bar(percentage: f64) -> Markup {
    let clamped = percentage.clamp(0.0, 100.0);

    // Ensure minimum 3% width so rounded corners are visible
    let display_percentage = if clamped > 0.0 && clamped < 3.0 {
        3.0
    } else {
        clamped
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5 mb-2"
            role="progressbar"
            aria-valuenow=(format_percentage(clamped))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class="bg-green-600 dark:bg-green-500 h-2.5 rounded-full transition-all"
                    style=(format!("width: {:.1}%", display_percentage))
                {}
            }
        }
    }
}
