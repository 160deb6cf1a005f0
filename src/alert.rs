//! Alert messages shown to the user after an HTMX request.
//!
//! Alerts are swapped into the `#alert-container` element of the base page.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A success or error message, errors may carry details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple {
        /// The headline.
        message: String,
    },
    /// An error message with details.
    Error {
        /// The headline.
        message: String,
        /// The text under the headline, usually how to fix the error.
        details: String,
    },
    /// An error message without details.
    ErrorSimple {
        /// The headline.
        message: String,
    },
}

const SUCCESS_STYLE: &str = "flex items-start p-4 mb-4 text-sm rounded-lg shadow \
    text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400 \
    border border-green-300 dark:border-green-800";

const ERROR_STYLE: &str = "flex items-start p-4 mb-4 text-sm rounded-lg shadow \
    text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400 \
    border border-red-300 dark:border-red-800";

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
            Alert::ErrorSimple { message } => (ERROR_STYLE, message, String::new()),
        };

        html! {
            div
                role="alert"
                class=(style)
                // Unhide the container that this alert gets swapped into.
                hx-on::load="document.getElementById('alert-container').classList.remove('hidden')"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-3 -mt-1 text-lg leading-none bg-transparent border-none cursor-pointer"
                    onclick="this.closest('[role=alert]').remove(); \
                        document.getElementById('alert-container').classList.add('hidden')"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
