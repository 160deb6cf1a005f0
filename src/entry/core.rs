//! The records tracked by the ledger: entries, the payments made against them,
//! and the derived balance.

use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// The opaque, unique identifier of an [Entry].
pub type EntryId = String;

/// The opaque, unique identifier of a [Payment].
pub type PaymentId = String;

/// Mint a new identifier for an entry or payment.
///
/// Identifiers are 21 character, URL-safe nanoids so they can be used in
/// route paths without escaping.
pub fn new_id() -> String {
    nanoid!()
}

/// The ledger an entry belongs to.
///
/// The serialized names are the ones used by the browser storage format the
/// data was exported from, including its spelling of "cheque".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Cheques the business will receive.
    #[serde(rename = "Chaque Receivables")]
    ChequeReceivables,
    /// Cheques the business has issued.
    #[serde(rename = "Chaque Payables")]
    ChequePayables,
    /// Long-term amounts owed by the business.
    #[serde(rename = "Long Term Payables")]
    LongTermPayables,
    /// Long-term amounts owed to the business.
    #[serde(rename = "Long Term Receivables")]
    LongTermReceivables,
    /// Online transfers from a sender that has not been identified yet.
    #[serde(rename = "Unknown Online")]
    UnknownOnline,
}

impl Category {
    /// Every category, in the order they are displayed.
    pub const ALL: [Category; 5] = [
        Category::ChequeReceivables,
        Category::ChequePayables,
        Category::LongTermPayables,
        Category::LongTermReceivables,
        Category::UnknownOnline,
    ];

    /// The human readable name of the category.
    pub fn label(self) -> &'static str {
        match self {
            Category::ChequeReceivables => "Cheque Receivables",
            Category::ChequePayables => "Cheque Payables",
            Category::LongTermPayables => "Long Term Payables",
            Category::LongTermReceivables => "Long Term Receivables",
            Category::UnknownOnline => "Unknown Online",
        }
    }

    /// The URL path segment for the category.
    pub fn slug(self) -> &'static str {
        match self {
            Category::ChequeReceivables => "cheque-receivables",
            Category::ChequePayables => "cheque-payables",
            Category::LongTermPayables => "long-term-payables",
            Category::LongTermReceivables => "long-term-receivables",
            Category::UnknownOnline => "unknown-online",
        }
    }

    /// Parse a category from its URL path segment, see [Category::slug].
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == slug)
    }

    /// Whether money in this category flows to the business.
    pub fn is_receivable(self) -> bool {
        matches!(
            self,
            Category::ChequeReceivables | Category::LongTermReceivables | Category::UnknownOnline
        )
    }
}

/// The status flag of an entry.
///
/// The status is set explicitly on creation, payment and confirmation. It is
/// not derived from the balance and may disagree with it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Fully paid.
    Paid,
    /// Past its due date.
    Overdue,
    /// An ongoing arrangement with payments still due.
    Active,
    /// An unknown online transfer whose sender has been identified.
    Confirmed,
}

impl EntryStatus {
    /// Every status, in the order they are offered in forms.
    pub const ALL: [EntryStatus; 5] = [
        EntryStatus::Pending,
        EntryStatus::Paid,
        EntryStatus::Overdue,
        EntryStatus::Active,
        EntryStatus::Confirmed,
    ];

    /// The display name, which is also the serialized name.
    pub fn label(self) -> &'static str {
        match self {
            EntryStatus::Pending => "Pending",
            EntryStatus::Paid => "Paid",
            EntryStatus::Overdue => "Overdue",
            EntryStatus::Active => "Active",
            EntryStatus::Confirmed => "Confirmed",
        }
    }
}

/// A single settlement applied to an [Entry]. Payments are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// The payment's unique identifier.
    pub id: PaymentId,
    /// When the payment was made, as entered by the user.
    pub date: String,
    /// The amount paid.
    pub amount: f64,
    /// The number of the cheque used for the payment, if any.
    #[serde(rename = "chaqueNo", default)]
    pub cheque_no: String,
    /// The accounting voucher number.
    #[serde(default)]
    pub voucher_no: String,
}

/// A receivable or payable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The entry's unique identifier.
    pub id: EntryId,
    /// The ledger the entry belongs to.
    pub category: Category,
    /// The creation date, as entered by the user (usually `YYYY-MM-DD`).
    pub date: String,
    /// The date of the underlying transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,
    /// A reference number, e.g. an invoice or cheque number.
    #[serde(default)]
    pub ref_no: String,
    /// The counterparty.
    #[serde(default)]
    pub party_name: String,
    /// The bank the cheque or transfer is drawn on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    /// The bank account number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_num: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub desc: String,
    /// The total amount owed.
    pub total_amount: f64,
    /// When the amount falls due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// The explicitly set status flag.
    #[serde(default)]
    pub status: EntryStatus,
    /// Payments in the order they were recorded.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Who identified the sender of an unknown online transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<String>,
}

impl Entry {
    /// The sum of all recorded payments.
    pub fn total_paid(&self) -> f64 {
        self.payments.iter().map(|payment| payment.amount).sum()
    }

    /// The outstanding amount, see [compute_balance].
    pub fn balance(&self) -> f64 {
        compute_balance(self)
    }
}

/// The amount still owed on `entry`: the total amount minus every payment.
///
/// Overpayment gives a negative balance. No rounding is applied.
pub fn compute_balance(entry: &Entry) -> f64 {
    entry.total_amount - entry.total_paid()
}

/// The fields supplied when creating an entry.
///
/// The id and payments are always set by the store; the status defaults to
/// [EntryStatus::Pending] when not given.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// The ledger the entry belongs to.
    pub category: Category,
    /// The creation date.
    pub date: String,
    /// The date of the underlying transaction.
    pub transaction_date: Option<String>,
    /// A reference number.
    pub ref_no: String,
    /// The counterparty.
    pub party_name: String,
    /// The bank name.
    pub bank_name: Option<String>,
    /// The bank account number.
    pub bank_account_num: Option<String>,
    /// Free text description.
    pub desc: String,
    /// The total amount owed.
    pub total_amount: f64,
    /// When the amount falls due.
    pub due_date: Option<String>,
    /// Overrides the default status.
    pub status: Option<EntryStatus>,
    /// Who identified the sender, for unknown online transfers.
    pub confirmed_by: Option<String>,
}

impl NewEntry {
    /// Create the fields for an entry with only the required details set.
    pub fn new(category: Category, date: &str, party_name: &str, total_amount: f64) -> Self {
        Self {
            category,
            date: date.to_owned(),
            transaction_date: None,
            ref_no: String::new(),
            party_name: party_name.to_owned(),
            bank_name: None,
            bank_account_num: None,
            desc: String::new(),
            total_amount,
            due_date: None,
            status: None,
            confirmed_by: None,
        }
    }

    /// Set the bank name.
    pub fn bank_name(mut self, bank_name: &str) -> Self {
        self.bank_name = Some(bank_name.to_owned());
        self
    }

    /// Set the status instead of the default.
    pub fn status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the reference number.
    pub fn ref_no(mut self, ref_no: &str) -> Self {
        self.ref_no = ref_no.to_owned();
        self
    }

    /// Set the due date.
    pub fn due_date(mut self, due_date: &str) -> Self {
        self.due_date = Some(due_date.to_owned());
        self
    }

    pub(crate) fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            category: self.category,
            date: self.date,
            transaction_date: self.transaction_date,
            ref_no: self.ref_no,
            party_name: self.party_name,
            bank_name: self.bank_name,
            bank_account_num: self.bank_account_num,
            desc: self.desc,
            total_amount: self.total_amount,
            due_date: self.due_date,
            status: self.status.unwrap_or_default(),
            payments: Vec::new(),
            confirmed_by: self.confirmed_by,
        }
    }
}

/// A partial update for an entry. Fields set to `None` are left unchanged.
///
/// Optional entry fields use a nested option so an update can clear them:
/// `Some(None)` removes the value.
#[derive(Debug, Default, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct EntryUpdate {
    pub category: Option<Category>,
    pub date: Option<String>,
    pub transaction_date: Option<Option<String>>,
    pub ref_no: Option<String>,
    pub party_name: Option<String>,
    pub bank_name: Option<Option<String>>,
    pub bank_account_num: Option<Option<String>>,
    pub desc: Option<String>,
    pub total_amount: Option<f64>,
    pub due_date: Option<Option<String>>,
    pub status: Option<EntryStatus>,
}

impl EntryUpdate {
    /// Shallow merge the set fields onto `entry`.
    pub(crate) fn apply_to(self, entry: &mut Entry) {
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(transaction_date) = self.transaction_date {
            entry.transaction_date = transaction_date;
        }
        if let Some(ref_no) = self.ref_no {
            entry.ref_no = ref_no;
        }
        if let Some(party_name) = self.party_name {
            entry.party_name = party_name;
        }
        if let Some(bank_name) = self.bank_name {
            entry.bank_name = bank_name;
        }
        if let Some(bank_account_num) = self.bank_account_num {
            entry.bank_account_num = bank_account_num;
        }
        if let Some(desc) = self.desc {
            entry.desc = desc;
        }
        if let Some(total_amount) = self.total_amount {
            entry.total_amount = total_amount;
        }
        if let Some(due_date) = self.due_date {
            entry.due_date = due_date;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}

/// The fields supplied when recording a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    /// When the payment was made.
    pub date: String,
    /// The amount paid.
    pub amount: f64,
    /// The cheque number.
    pub cheque_no: String,
    /// The voucher number.
    pub voucher_no: String,
}

impl NewPayment {
    /// A payment of `amount` on `date` without cheque or voucher numbers.
    pub fn new(date: &str, amount: f64) -> Self {
        Self {
            date: date.to_owned(),
            amount,
            cheque_no: String::new(),
            voucher_no: String::new(),
        }
    }

    pub(crate) fn into_payment(self, id: PaymentId) -> Payment {
        Payment {
            id,
            date: self.date,
            amount: self.amount,
            cheque_no: self.cheque_no,
            voucher_no: self.voucher_no,
        }
    }
}


#[cfg(test)]
mod serialization_tests {
    use super::{Category, Entry, EntryStatus};

    #[test]
    fn reads_browser_storage_format() {
        let json = r#"{
            "id": "1718000000000",
            "category": "Chaque Receivables",
            "date": "2025-03-04",
            "refNo": "R-12",
            "partyName": "Acme Traders",
            "bankName": "HBL",
            "desc": "",
            "totalAmount": 5000,
            "status": "Active",
            "payments": [
                {"id": "p1", "date": "2025-03-05", "amount": 1000, "chaqueNo": "77", "voucherNo": "V1"}
            ]
        }"#;

        let entry: Entry = serde_json::from_str(json).expect("could not parse entry");

        assert_eq!(entry.category, Category::ChequeReceivables);
        assert_eq!(entry.status, EntryStatus::Active);
        assert_eq!(entry.bank_name.as_deref(), Some("HBL"));
        assert_eq!(entry.bank_account_num, None);
        assert_eq!(entry.payments[0].cheque_no, "77");
        assert_eq!(entry.balance(), 4000.0);
    }

    #[test]
    fn writes_camel_case_field_names() {
        let json = r#"{"id":"1","category":"Unknown Online","date":"2025-03-04","refNo":"","partyName":"","desc":"","totalAmount":1.5,"status":"Pending","payments":[]}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        let serialized = serde_json::to_string(&entry).unwrap();

        assert_eq!(serialized, json);
    }
}
