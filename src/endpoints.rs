//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/entries/{entry_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The summary of every ledger.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for AI generated insights.
pub const INSIGHTS_VIEW: &str = "/insights";
/// The table of entries for one category.
pub const LEDGER_VIEW: &str = "/ledger/{category}";
/// The page for creating a new entry.
pub const NEW_ENTRY_VIEW: &str = "/entries/new";
/// The page for editing an existing entry.
pub const EDIT_ENTRY_VIEW: &str = "/entries/{entry_id}/edit";
/// The page for recording a payment against an entry.
pub const PAY_ENTRY_VIEW: &str = "/entries/{entry_id}/pay";
/// The page for identifying the sender of an unknown online transfer.
pub const CONFIRM_ENTRY_VIEW: &str = "/entries/{entry_id}/confirm";
/// The payment history of an entry.
pub const ENTRY_HISTORY_VIEW: &str = "/entries/{entry_id}/history";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create entries.
pub const ENTRIES_API: &str = "/api/entries";
/// The route to update or delete a single entry.
pub const ENTRY_API: &str = "/api/entries/{entry_id}";
/// The route to record a payment against an entry.
pub const ENTRY_PAYMENTS_API: &str = "/api/entries/{entry_id}/payments";
/// The route to confirm an unknown online transfer.
pub const ENTRY_CONFIRM_API: &str = "/api/entries/{entry_id}/confirm";
/// The route that generates AI insights.
pub const INSIGHTS_API: &str = "/api/insights";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/entries/{entry_id}', '{entry_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
