//! The AI insights page and the endpoint that generates the insights.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    entry::EntryStore,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner},
    insights::client::InsightsClient,
    navigation::NavBar,
};

/// The state needed for the insights page and endpoint.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// The ledger the insights are generated for.
    pub entry_store: Arc<Mutex<EntryStore>>,
    /// The client for the AI service.
    pub insights_client: InsightsClient,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entry_store: state.entry_store.clone(),
            insights_client: state.insights_client.clone(),
        }
    }
}

/// Renders the insights page.
pub async fn get_insights_page(State(state): State<InsightsState>) -> Result<Response, Error> {
    let entry_count = state
        .entry_store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?
        .entries()
        .len();

    Ok(insights_view(entry_count, state.insights_client.is_configured()).into_response())
}

fn insights_view(entry_count: usize, is_configured: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::INSIGHTS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                h1 class="text-xl font-bold" { "AI Smart Insights" }

                p class="text-gray-600 dark:text-gray-400"
                {
                    "Get a summary of your cash position and the items that need attention across "
                    (entry_count) " entries."
                }

                @if is_configured {
                    form
                        id="indicator"
                        hx-post=(endpoints::INSIGHTS_API)
                        hx-target="#insights-result"
                        hx-target-error="#alert-container"
                        hx-disabled-elt="find button"
                    {
                        button type="submit" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span class="htmx-indicator" { (loading_spinner()) }
                            "Generate Insights"
                        }
                    }
                } @else {
                    p data-insights-disabled="true" class="text-amber-700 dark:text-amber-400"
                    {
                        "AI insights are disabled. Set the GEMINI_API_KEY environment \
                        variable and restart the server to enable them."
                    }
                }

                article
                    id="insights-result"
                    class="p-4 rounded bg-white dark:bg-gray-800 shadow-sm empty:hidden"
                {}
            }
        }
    };

    base("AI Insights", &[], &content)
}

/// Generates insights for the whole ledger and responds with them as an HTML fragment.
///
/// The entries are copied out of the store so the lock is not held while
/// waiting for the AI service.
pub async fn generate_insights_endpoint(State(state): State<InsightsState>) -> Response {
    let entries = match state.entry_store.lock() {
        Ok(store) => store.entries().to_vec(),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match state.insights_client.generate(&entries).await {
        Ok(text) => insights_text_view(&text).into_response(),
        Err(error) => {
            tracing::error!("could not generate insights: {error}");
            error.into_alert_response()
        }
    }
}

/// Render the generated text, one paragraph per block of lines.
fn insights_text_view(text: &str) -> Markup {
    html! {
        @for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p class="mb-3 whitespace-pre-line" { (paragraph) }
        }
    }
}
