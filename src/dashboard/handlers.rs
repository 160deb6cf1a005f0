//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    dashboard::{
        cards::{category_cards_view, totals_view},
        charts::{DashboardChart, charts_script, charts_view, outstanding_chart, settlement_chart},
    },
    endpoints,
    entry::{CategorySummary, EntryStore, OutstandingTotals, summarize_by_category},
    html::{ECHARTS_SCRIPT_URL, HeadElement, base, link},
    navigation::NavBar,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The ledger to summarise.
    pub entry_store: Arc<Mutex<EntryStore>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
        }
    }
}

/// Display a page with an overview of every ledger.
///
/// The dashboard always summarises the whole collection, none of the
/// ledger page filters apply.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let store = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);
    let entries = store.entries();

    if entries.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let summaries = summarize_by_category(entries);
    let totals = OutstandingTotals::from_entries(entries);
    let charts = build_dashboard_charts(&summaries);

    Ok(dashboard_view(nav_bar, &totals, &summaries, &charts).into_response())
}

/// Creates the dashboard charts from the category summaries.
fn build_dashboard_charts(summaries: &[CategorySummary]) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "outstanding-chart",
            options: outstanding_chart(summaries).to_string(),
        },
        DashboardChart {
            id: "settlement-chart",
            options: settlement_chart(summaries).to_string(),
        },
    ]
}

/// Renders the dashboard page when there are no entries.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_entry_link = link(endpoints::NEW_ENTRY_VIEW, "adding an entry");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Totals and charts will show up here once you start by "
                (new_entry_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with totals, ledger cards and charts.
fn dashboard_view(
    nav_bar: NavBar,
    totals: &OutstandingTotals,
    summaries: &[CategorySummary],
    charts: &[DashboardChart],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (totals_view(totals))
            (category_cards_view(summaries))
            (charts_view(charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use scraper::{Html, Selector};

    use crate::{
        dashboard::handlers::{DashboardState, get_dashboard_page},
        entry::{Category, EntryStatus, NewEntry},
        html::ECHARTS_SCRIPT_URL,
        test_utils::{
            assert_valid_html, must_add_entry, must_create_test_store, parse_html_document,
        },
    };

    fn get_test_state() -> DashboardState {
        DashboardState {
            entry_store: must_create_test_store(),
        }
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    fn total_text(html: &Html, name: &str) -> String {
        html.select(&Selector::parse(&format!("[data-total={name}]")).unwrap())
            .next()
            .unwrap()
            .text()
            .collect()
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let state = get_test_state();
        must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::ChequeReceivables, "2025-03-01", "Acme", 1000.0),
        );
        must_add_entry(
            &state.entry_store,
            NewEntry::new(Category::LongTermPayables, "2025-03-02", "Landlord", 400.0)
                .status(EntryStatus::Active),
        );

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_chart_exists(&html, "outstanding-chart");
        assert_chart_exists(&html, "settlement-chart");
        let echarts = Selector::parse(&format!("script[src=\"{ECHARTS_SCRIPT_URL}\"]")).unwrap();
        assert!(html.select(&echarts).next().is_some());
        assert!(total_text(&html, "receivable").contains("Rs 1,000.00"));
        assert!(total_text(&html, "payable").contains("Rs 400.00"));
        assert!(total_text(&html, "net").contains("Rs 600.00"));
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let response = get_dashboard_page(State(get_test_state())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("#outstanding-chart").unwrap())
                .next()
                .is_none()
        );
        let text: String = html.root_element().text().collect();
        assert!(text.contains("Nothing here yet"));
    }
}
