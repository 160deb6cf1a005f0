//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    entry::{
        confirm_entry_endpoint, create_entry_endpoint, delete_entry_endpoint, edit_entry_endpoint,
        get_confirm_entry_page, get_create_entry_page, get_edit_entry_page, get_ledger_page,
    },
    insights::{generate_insights_endpoint, get_insights_page},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    payment::{get_pay_entry_page, get_payment_history_page, record_payment_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INSIGHTS_VIEW, get(get_insights_page))
        .route(endpoints::LEDGER_VIEW, get(get_ledger_page))
        .route(endpoints::NEW_ENTRY_VIEW, get(get_create_entry_page))
        .route(endpoints::EDIT_ENTRY_VIEW, get(get_edit_entry_page))
        .route(endpoints::PAY_ENTRY_VIEW, get(get_pay_entry_page))
        .route(endpoints::CONFIRM_ENTRY_VIEW, get(get_confirm_entry_page))
        .route(endpoints::ENTRY_HISTORY_VIEW, get(get_payment_history_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // The API routes respond to HTMX requests with HX-Redirect headers or alerts.
    let api_routes = Router::new()
        .route(endpoints::ENTRIES_API, post(create_entry_endpoint))
        .route(
            endpoints::ENTRY_API,
            put(edit_entry_endpoint).delete(delete_entry_endpoint),
        )
        .route(endpoints::ENTRY_PAYMENTS_API, post(record_payment_endpoint))
        .route(endpoints::ENTRY_CONFIRM_API, post(confirm_entry_endpoint))
        .route(endpoints::INSIGHTS_API, post(generate_insights_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, build_router, insights::InsightsConfig};

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "Asia/Karachi", InsightsConfig::default())
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn created_entry_shows_in_ledger() {
        let server = get_test_server();
        let form = [
            ("category", "cheque-payables"),
            ("date", "2025-03-01"),
            ("party_name", "Acme Traders"),
            ("bank_name", "HBL"),
            ("total_amount", "1500"),
            ("status", "Pending"),
        ];

        let response = server.post("/api/entries").form(&form).await;
        response.assert_status(StatusCode::SEE_OTHER);

        let ledger = server.get("/ledger/cheque-payables").await;
        ledger.assert_status_ok();
        assert!(ledger.text().contains("Acme Traders"));

        let other_ledger = server.get("/ledger/cheque-receivables").await;
        assert!(!other_ledger.text().contains("Acme Traders"));
    }

    #[tokio::test]
    async fn serves_stylesheet_linked_by_pages() {
        let server = get_test_server();

        let page = server.get("/dashboard").await;
        page.assert_status_ok();
        assert!(page.text().contains(r#"href="/static/main.css""#));

        let stylesheet = server.get("/static/main.css").await;
        stylesheet.assert_status_ok();
        assert!(stylesheet.text().contains(".hidden"));
    }

    #[tokio::test]
    async fn unknown_ledger_is_not_found() {
        let server = get_test_server();

        server
            .get("/ledger/savings")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_form_fields_are_rejected() {
        let server = get_test_server();

        server
            .post("/api/entries")
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
