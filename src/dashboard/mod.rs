//! Dashboard module
//!
//! Provides an overview page with the outstanding totals of every ledger
//! and charts comparing them.

mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
