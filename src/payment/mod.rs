//! Recording payments against entries and viewing their history.

mod history_page;
mod pay;

pub use history_page::get_payment_history_page;
pub use pay::{get_pay_entry_page, record_payment_endpoint};
