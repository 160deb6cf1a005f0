//! A small client for the Gemini `generateContent` API.

use std::{fmt, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    entry::{Entry, OutstandingTotals, StatSummary, summarize_by_category},
};

/// The model used when none is configured.
pub const DEFAULT_INSIGHTS_MODEL: &str = "gemini-2.5-flash";

/// The API root used when none is configured.
pub const DEFAULT_INSIGHTS_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How many outstanding entries are listed in the prompt.
const PROMPT_ENTRY_LIMIT: usize = 20;

/// Settings for the insights service.
#[derive(Clone)]
pub struct InsightsConfig {
    /// The API key, insights are disabled without one.
    pub api_key: Option<String>,
    /// The model name, e.g. "gemini-2.5-flash".
    pub model: String,
    /// The API root, without a trailing slash.
    pub base_url: String,
    /// The time limit for a single request.
    pub timeout_seconds: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_INSIGHTS_MODEL.to_owned(),
            base_url: DEFAULT_INSIGHTS_BASE_URL.to_owned(),
            timeout_seconds: 30,
        }
    }
}

impl fmt::Debug for InsightsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// The text of the first candidate, or `None` if it has no text.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|part| part.text).collect();

        (!text.trim().is_empty()).then_some(text)
    }
}

/// Generates a written summary of the ledger.
#[derive(Debug, Clone)]
pub struct InsightsClient {
    client: Client,
    config: InsightsConfig,
}

impl InsightsClient {
    /// Create a client with `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client could not be built.
    pub fn new(config: InsightsConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|error| {
                Error::InsightsRequestError(format!("could not build HTTP client: {error}"))
            })?;

        Ok(Self { client, config })
    }

    /// Whether an API key has been configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Ask the model for insights on `entries`.
    ///
    /// # Errors
    /// Returns [Error::InsightsNotConfigured] without an API key, or
    /// [Error::InsightsRequestError] if the request fails or the response
    /// has no text.
    pub async fn generate(&self, entries: &[Entry]) -> Result<String, Error> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::InsightsNotConfigured)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(entries),
                }],
            }],
        };

        tracing::info!(
            "requesting insights for {} entries from {}",
            entries.len(),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|error| Error::InsightsRequestError(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            tracing::error!("insights request failed with status {status}: {details}");
            return Err(Error::InsightsRequestError(format!(
                "the service responded with {status}"
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|error| Error::InsightsRequestError(error.to_string()))?
            .into_text()
            .ok_or_else(|| Error::InsightsRequestError("the response had no text".to_owned()))
    }
}

/// Describe the ledger for the model.
///
/// The prompt has the overall and per category totals followed by the
/// entries with the largest outstanding balances.
pub fn build_prompt(entries: &[Entry]) -> String {
    let overall = StatSummary::from_entries(entries);
    let outstanding = OutstandingTotals::from_entries(entries);

    let mut prompt = String::from(
        "You are a financial assistant for a small business that tracks cheques \
        and long-term receivables and payables. Review the ledger below and give \
        a short summary of its cash position, the most pressing overdue or \
        pending items and practical recommendations. Amounts are in rupees.\n\n",
    );

    prompt.push_str(&format!(
        "Overall: {} entries, total {:.2}, paid {:.2}, pending {:.2}, overdue {:.2}.\n",
        entries.len(),
        overall.total,
        overall.paid,
        overall.pending,
        overall.overdue
    ));
    prompt.push_str(&format!(
        "Outstanding receivables {:.2}, outstanding payables {:.2}.\n\n",
        outstanding.receivable, outstanding.payable
    ));

    prompt.push_str("By category:\n");
    for summary in summarize_by_category(entries) {
        prompt.push_str(&format!(
            "- {}: {} entries, total {:.2}, paid {:.2}, outstanding {:.2}\n",
            summary.category.label(),
            summary.counts.all,
            summary.stats.total,
            summary.stats.paid,
            summary.stats.outstanding()
        ));
    }

    let mut open_entries: Vec<&Entry> = entries.iter().filter(|e| e.balance() > 0.0).collect();
    open_entries.sort_by(|a, b| b.balance().total_cmp(&a.balance()));

    if !open_entries.is_empty() {
        prompt.push_str("\nLargest outstanding entries:\n");
    }

    for entry in open_entries.into_iter().take(PROMPT_ENTRY_LIMIT) {
        prompt.push_str(&format!(
            "- {} | {} | {} | balance {:.2} of {:.2} | status {} | due {}\n",
            entry.date,
            entry.category.label(),
            if entry.party_name.is_empty() {
                "unknown party"
            } else {
                entry.party_name.as_str()
            },
            entry.balance(),
            entry.total_amount,
            entry.status.label(),
            entry.due_date.as_deref().unwrap_or("not set")
        ));
    }

    prompt
}
