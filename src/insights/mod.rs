//! AI generated insights about the whole ledger.

mod client;
mod page;

pub use client::{
    DEFAULT_INSIGHTS_BASE_URL, DEFAULT_INSIGHTS_MODEL, InsightsClient, InsightsConfig,
};
pub use page::{generate_insights_endpoint, get_insights_page};
