//! Parchi is a web app for tracking cheques, long-term receivables and
//! payables, and unidentified online transfers for a small business.
//!
//! This library provides a REST API that directly serves HTML pages. The
//! ledger is held in memory and mirrored to a SQLite database after every
//! change.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod entry;
mod error;
mod html;
mod insights;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod payment;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use entry::{
    Category, Entry, EntryId, EntryStatus, EntryStore, EntryUpdate, MonthFilter, NewEntry,
    NewPayment, Payment, PaymentId, SearchMode, StatFilter, View, ViewFilter, compute_balance,
    filter_view,
};
pub use error::Error;
pub use insights::{DEFAULT_INSIGHTS_BASE_URL, DEFAULT_INSIGHTS_MODEL, InsightsConfig};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
