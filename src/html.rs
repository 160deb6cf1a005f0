//! Shared page layout, styles and formatting helpers for the HTML views.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::entry::EntryStatus;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The stylesheet served from the static directory.
pub const MAIN_STYLESHEET: &str = "/static/main.css";

/// Pinned htmx release.
pub const HTMX_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";
const HTMX_SCRIPT_INTEGRITY: &str =
    "sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz";

/// Pinned release of the htmx extension that swaps error responses into `hx-target-error`.
pub const HTMX_RESPONSE_TARGETS_URL: &str =
    "https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4/dist/response-targets.js";
const HTMX_RESPONSE_TARGETS_INTEGRITY: &str =
    "sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg";

/// Pinned ECharts release used by the dashboard.
pub const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    Style(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Parchi" }
                link href=(MAIN_STYLESHEET) rel="stylesheet";

                script src=(HTMX_SCRIPT_URL) integrity=(HTMX_SCRIPT_INTEGRITY) crossorigin="anonymous" {}
                script
                    src=(HTMX_RESPONSE_TARGETS_URL)
                    integrity=(HTMX_RESPONSE_TARGETS_INTEGRITY)
                    crossorigin="anonymous"
                {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }

                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// The symbol amounts are displayed with.
pub const CURRENCY_SYMBOL: &str = "Rs";

/// The CSS for prefixing number inputs inside an `.input-wrapper` with the currency symbol.
pub fn currency_input_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        r#"
        .input-wrapper {
            position: relative;
            display: block;
        }
        .input-wrapper input[type="number"] {
            padding-left: 2.2rem;
        }
        .input-wrapper::before {
            content: 'Rs';
            position: absolute;
            left: 0.6rem;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
        }
        "#
        .to_owned(),
    ))
}

fn currency_formatter(prefix: &str, decimals: u8) -> Formatter {
    Formatter::currency(prefix)
        .expect("currency prefix is too long")
        .precision(Precision::Decimals(decimals))
}

/// Format `number` as an amount with two decimal places, e.g. "Rs 1,234.50".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("Rs ", 2));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-Rs ", 2));

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        format!("{CURRENCY_SYMBOL} 0.00")
    };

    // numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and "12.00" as "12".
    match formatted_string.rfind('.') {
        Some(dot) if formatted_string.len() - dot == 2 => formatted_string.push('0'),
        None => formatted_string.push_str(".00"),
        _ => {}
    }

    formatted_string
}

/// Format `number` rounded to the nearest whole amount, e.g. "Rs 1,235".
pub fn format_currency_rounded(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("Rs ", 0));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-Rs ", 0));

    let number = number.round();

    if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        format!("{CURRENCY_SYMBOL} 0")
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}

/// The colours of the badge for each entry status.
fn status_badge_colours(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Paid => "bg-emerald-100 text-emerald-700 border-emerald-200",
        EntryStatus::Pending => "bg-amber-100 text-amber-700 border-amber-200",
        EntryStatus::Overdue => "bg-rose-100 text-rose-700 border-rose-200",
        EntryStatus::Active => "bg-blue-100 text-blue-700 border-blue-200",
        EntryStatus::Confirmed => "bg-purple-100 text-purple-700 border-purple-200",
    }
}

/// A pill showing the status flag of an entry.
pub fn status_badge(status: EntryStatus) -> Markup {
    html! {
        span
            class={
                "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold \
                rounded-full border " (status_badge_colours(status))
            }
            data-status=(status.label())
        {
            (status.label())
        }
    }
}

/// An edit link next to a delete button that asks for confirmation.
///
/// `hx_target` and `hx_swap` decide what is removed from the page once the
/// delete request succeeds.
pub fn edit_delete_action_links(
    edit_url: &str,
    delete_url: &str,
    confirm_message: &str,
    hx_target: &str,
    hx_swap: &str,
) -> Markup {
    html! {
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-target=(hx_target)
            hx-target-error="#alert-container"
            hx-swap=(hx_swap)
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    }
}

#[cfg(test)]
mod base_tests {
    use maud::html;
    use scraper::{Html, Selector};

    use crate::html::{HTMX_RESPONSE_TARGETS_URL, HTMX_SCRIPT_URL, MAIN_STYLESHEET, base};

    #[test]
    fn head_loads_stylesheet_and_htmx() {
        let markup = base("Test", &[], &html!(p { "content" }));

        let html = Html::parse_document(&markup.into_string());
        let scripts: Vec<_> = html
            .select(&Selector::parse("head script[src]").unwrap())
            .collect();
        let sources: Vec<&str> = scripts
            .iter()
            .filter_map(|script| script.value().attr("src"))
            .collect();
        assert_eq!(sources, vec![HTMX_SCRIPT_URL, HTMX_RESPONSE_TARGETS_URL]);
        for script in scripts {
            assert!(script.value().attr("integrity").is_some());
            assert_eq!(script.value().attr("crossorigin"), Some("anonymous"));
        }

        let stylesheet = html
            .select(&Selector::parse("head link[rel=stylesheet]").unwrap())
            .next()
            .unwrap();
        assert_eq!(stylesheet.value().attr("href"), Some(MAIN_STYLESHEET));
    }
}

#[cfg(test)]
mod format_currency_tests {
    use crate::html::{format_currency, format_currency_rounded};

    #[test]
    fn formats_with_symbol_and_separators() {
        assert_eq!(format_currency(1234.5), "Rs 1,234.50");
    }

    #[test]
    fn formats_whole_numbers_with_two_decimals() {
        assert_eq!(format_currency(100.0), "Rs 100.00");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "Rs 0.00");
    }

    #[test]
    fn formats_negative() {
        assert_eq!(format_currency(-12.25), "-Rs 12.25");
    }

    #[test]
    fn rounded() {
        assert_eq!(format_currency_rounded(1234.5), "Rs 1,235");
        assert_eq!(format_currency_rounded(0.2), "Rs 0");
    }
}

#[cfg(test)]
mod status_badge_tests {
    use scraper::{Html, Selector};

    use crate::{entry::EntryStatus, html::status_badge};

    #[test]
    fn each_status_has_its_own_colour() {
        let classes: Vec<String> = EntryStatus::ALL
            .into_iter()
            .map(|status| {
                let html = Html::parse_fragment(&status_badge(status).into_string());
                let span = html
                    .select(&Selector::parse("span").unwrap())
                    .next()
                    .unwrap();
                assert_eq!(span.text().collect::<String>(), status.label());
                span.value().attr("class").unwrap().to_owned()
            })
            .collect();

        for (i, class) in classes.iter().enumerate() {
            for other in &classes[i + 1..] {
                assert_ne!(class, other);
            }
        }
    }
}
