//! Totals derived from a set of entries for the stat cards and dashboard.

use crate::entry::{
    core::{Category, Entry},
    filter::StatFilter,
};

/// Money totals over a set of entries.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StatSummary {
    /// The sum of the total amounts.
    pub total: f64,
    /// The sum of all payments.
    pub paid: f64,
    /// The outstanding balance of the entries matching [StatFilter::Pending].
    pub pending: f64,
    /// The outstanding balance of the entries matching [StatFilter::Overdue].
    pub overdue: f64,
}

impl StatSummary {
    /// Sum up `entries`.
    ///
    /// Active entries with a balance count towards both `pending` and
    /// `overdue`, mirroring the status filters.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut summary, entry| {
                let balance = entry.balance();
                summary.total += entry.total_amount;
                summary.paid += entry.total_paid();

                if StatFilter::Pending.matches(entry) {
                    summary.pending += balance;
                }
                if StatFilter::Overdue.matches(entry) {
                    summary.overdue += balance;
                }

                summary
            })
    }

    /// The outstanding amount, total minus paid.
    pub fn outstanding(&self) -> f64 {
        self.total - self.paid
    }
}

/// How many entries fall into each status partition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatCounts {
    /// Every entry.
    pub all: usize,
    /// Entries matching [StatFilter::Paid].
    pub paid: usize,
    /// Entries matching [StatFilter::Pending].
    pub pending: usize,
    /// Entries matching [StatFilter::Overdue].
    pub overdue: usize,
}

impl StatCounts {
    /// Count `entries` per partition.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut counts, entry| {
                counts.all += 1;
                counts.paid += usize::from(StatFilter::Paid.matches(entry));
                counts.pending += usize::from(StatFilter::Pending.matches(entry));
                counts.overdue += usize::from(StatFilter::Overdue.matches(entry));
                counts
            })
    }

    /// The count for `filter`.
    pub fn get(&self, filter: StatFilter) -> usize {
        match filter {
            StatFilter::All => self.all,
            StatFilter::Paid => self.paid,
            StatFilter::Pending => self.pending,
            StatFilter::Overdue => self.overdue,
        }
    }
}

/// The totals for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySummary {
    /// The category summarised.
    pub category: Category,
    /// Money totals for the category.
    pub stats: StatSummary,
    /// Entry counts for the category.
    pub counts: StatCounts,
}

/// Summarise each category in [Category::ALL] order, including empty ones.
pub fn summarize_by_category(entries: &[Entry]) -> Vec<CategorySummary> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let in_category = || entries.iter().filter(move |e| e.category == category);

            CategorySummary {
                category,
                stats: StatSummary::from_entries(in_category()),
                counts: StatCounts::from_entries(in_category()),
            }
        })
        .collect()
}

/// Outstanding balances split by the direction money flows.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OutstandingTotals {
    /// Owed to the business.
    pub receivable: f64,
    /// Owed by the business.
    pub payable: f64,
}

impl OutstandingTotals {
    /// Sum the balances of `entries` by [Category::is_receivable].
    pub fn from_entries(entries: &[Entry]) -> Self {
        entries.iter().fold(Self::default(), |mut totals, entry| {
            if entry.category.is_receivable() {
                totals.receivable += entry.balance();
            } else {
                totals.payable += entry.balance();
            }
            totals
        })
    }

    /// Receivables minus payables.
    pub fn net(&self) -> f64 {
        self.receivable - self.payable
    }
}
