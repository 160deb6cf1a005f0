//! Receivable and payable entries: the domain types, the store that owns them,
//! the view pipeline and the pages for managing them.

mod confirm;
mod core;
mod create;
mod delete_endpoint;
mod edit;
mod filter;
mod form;
mod ledger_page;
mod store;
mod summary;

pub use confirm::{confirm_entry_endpoint, get_confirm_entry_page};
pub use core::{
    Category, Entry, EntryId, EntryStatus, EntryUpdate, NewEntry, NewPayment, Payment, PaymentId,
    compute_balance,
};
pub use create::{create_entry_endpoint, get_create_entry_page};
pub use delete_endpoint::delete_entry_endpoint;
pub use edit::{edit_entry_endpoint, get_edit_entry_page};
pub use filter::{MonthFilter, SearchMode, StatFilter, View, ViewFilter, filter_view};
pub use ledger_page::get_ledger_page;
pub use store::EntryStore;
pub use summary::{
    CategorySummary, OutstandingTotals, StatCounts, StatSummary, summarize_by_category,
};
