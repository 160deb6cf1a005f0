//! The view pipeline that narrows the entry collection down to what is displayed.
//!
//! Filters are applied in a fixed order: category, month, search, then status.
//! Each stage is a per-entry predicate, so the result keeps the input order.

use serde::{Deserialize, Serialize};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::entry::core::{Category, Entry, EntryStatus};

/// What the user is looking at.
///
/// The aggregate views consume the whole collection, only the category views
/// narrow it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The summary of every category.
    Dashboard,
    /// The AI generated insights.
    Insights,
    /// The table for a single category.
    Category(Category),
}

/// Restricts entries by the month of their date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthFilter {
    /// Every entry.
    #[default]
    All,
    /// Entries dated in the current calendar month.
    Current,
    /// Entries dated in the previous calendar month.
    Last,
}

impl MonthFilter {
    /// The options offered to the user, in display order.
    pub const ALL: [MonthFilter; 3] = [MonthFilter::All, MonthFilter::Current, MonthFilter::Last];

    /// The display name of the option.
    pub fn label(self) -> &'static str {
        match self {
            MonthFilter::All => "All Records",
            MonthFilter::Current => "Current Month",
            MonthFilter::Last => "Previous Month",
        }
    }

    /// The query string value of the option.
    pub fn as_query_value(self) -> &'static str {
        match self {
            MonthFilter::All => "all",
            MonthFilter::Current => "current",
            MonthFilter::Last => "last",
        }
    }

    /// Whether an entry dated `date` is kept when today is `today`.
    ///
    /// Dates that cannot be parsed never match a month restriction.
    pub fn matches(self, date: &str, today: Date) -> bool {
        let (year, month) = match self {
            MonthFilter::All => return true,
            MonthFilter::Current => (today.year(), today.month()),
            MonthFilter::Last => previous_month(today),
        };

        parse_entry_date(date)
            .is_some_and(|entry_date| entry_date.year() == year && entry_date.month() == month)
    }
}

/// The year and month before the month of `today`.
fn previous_month(today: Date) -> (i32, Month) {
    match today.month() {
        Month::January => (today.year() - 1, Month::December),
        month => (today.year(), month.previous()),
    }
}

const ENTRY_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse the calendar date at the start of an entry date string.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
pub fn parse_entry_date(date: &str) -> Option<Date> {
    let date = date.trim();
    let date = date.get(..10).unwrap_or(date);

    Date::parse(date, ENTRY_DATE_FORMAT).ok()
}

/// The field the search query is matched against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// The counterparty name.
    #[default]
    Party,
    /// The entry date string.
    Date,
    /// The bank name.
    Bank,
}

impl SearchMode {
    /// The options offered to the user, in display order.
    pub const ALL: [SearchMode; 3] = [SearchMode::Party, SearchMode::Date, SearchMode::Bank];

    /// The display name of the option.
    pub fn label(self) -> &'static str {
        match self {
            SearchMode::Party => "Party",
            SearchMode::Date => "Date",
            SearchMode::Bank => "Bank",
        }
    }

    /// The query string value of the option.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SearchMode::Party => "party",
            SearchMode::Date => "date",
            SearchMode::Bank => "bank",
        }
    }

    /// Whether `entry` matches `query`, which must already be lower case.
    fn matches(self, entry: &Entry, query: &str) -> bool {
        match self {
            SearchMode::Party => entry.party_name.to_lowercase().contains(query),
            SearchMode::Date => entry.date.contains(query),
            SearchMode::Bank => entry
                .bank_name
                .as_ref()
                .is_some_and(|bank_name| bank_name.to_lowercase().contains(query)),
        }
    }
}

/// Partitions entries by their balance and status flag.
///
/// `Pending` and `Overdue` overlap: an [EntryStatus::Active] entry with a
/// positive balance matches both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatFilter {
    /// Every entry.
    #[default]
    All,
    /// Balance of zero or less.
    Paid,
    /// Positive balance and not flagged as overdue.
    Pending,
    /// Positive balance and flagged as overdue or active.
    Overdue,
}

impl StatFilter {
    /// The options offered to the user, in display order.
    pub const ALL: [StatFilter; 4] = [
        StatFilter::All,
        StatFilter::Paid,
        StatFilter::Pending,
        StatFilter::Overdue,
    ];

    /// The display name of the option.
    pub fn label(self) -> &'static str {
        match self {
            StatFilter::All => "All",
            StatFilter::Paid => "Paid",
            StatFilter::Pending => "Pending",
            StatFilter::Overdue => "Overdue",
        }
    }

    /// Whether `entry` belongs to this partition.
    pub fn matches(self, entry: &Entry) -> bool {
        let balance = entry.balance();

        match self {
            StatFilter::All => true,
            StatFilter::Paid => balance <= 0.0,
            StatFilter::Pending => balance > 0.0 && entry.status != EntryStatus::Overdue,
            StatFilter::Overdue => {
                balance > 0.0
                    && matches!(entry.status, EntryStatus::Overdue | EntryStatus::Active)
            }
        }
    }
}

/// The user selected filters for a category view.
///
/// Doubles as the query string of the category table page.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewFilter {
    /// The month restriction.
    pub month: MonthFilter,
    /// The search query, matching is case-insensitive.
    pub search: String,
    /// The field the search query is matched against.
    pub search_by: SearchMode,
    /// The balance/status partition.
    pub status: StatFilter,
}

impl ViewFilter {
    /// A copy of the filter with a different status partition.
    pub fn with_status(&self, status: StatFilter) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Apply the view pipeline to `entries`.
///
/// `today` is the caller's local date and decides which months the month
/// filter selects. The returned entries keep their original order.
pub fn filter_view<'a>(
    entries: &'a [Entry],
    view: View,
    filter: &ViewFilter,
    today: Date,
) -> Vec<&'a Entry> {
    let query = filter.search.to_lowercase();

    entries
        .iter()
        .filter(|entry| match view {
            View::Category(category) => entry.category == category,
            View::Dashboard | View::Insights => true,
        })
        .filter(|entry| filter.month.matches(&entry.date, today))
        .filter(|entry| query.is_empty() || filter.search_by.matches(entry, &query))
        .filter(|entry| filter.status.matches(entry))
        .collect()
}


#[cfg(test)]
mod view_filter_query_tests {
    use crate::entry::filter::{MonthFilter, SearchMode, StatFilter, ViewFilter};

    #[test]
    fn missing_params_use_defaults() {
        let filter: ViewFilter = serde_urlencoded::from_str("").unwrap();

        assert_eq!(filter, ViewFilter::default());
    }

    #[test]
    fn parses_all_params() {
        let filter: ViewFilter =
            serde_urlencoded::from_str("month=last&search=hbl&search_by=bank&status=overdue")
                .unwrap();

        assert_eq!(
            filter,
            ViewFilter {
                month: MonthFilter::Last,
                search: "hbl".to_owned(),
                search_by: SearchMode::Bank,
                status: StatFilter::Overdue,
            }
        );
    }
}
