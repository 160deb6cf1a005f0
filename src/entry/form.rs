//! The form shared by the create and edit entry pages.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    entry::{
        core::{Category, Entry, EntryStatus, EntryUpdate, NewEntry},
        filter::parse_entry_date,
    },
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The banks suggested for the bank name field.
pub const BANK_LIST: [&str; 7] = [
    "HBL",
    "Meezan Bank",
    "UBL Bank",
    "Allied Bank",
    "Faysal Bank",
    "Alfalah Bank",
    "Other Bank",
];

/// The form data for creating or editing an entry.
///
/// Optional text fields are submitted as empty strings when left blank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryForm {
    /// The category slug, see [Category::slug].
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub transaction_date: String,
    #[serde(default)]
    pub ref_no: String,
    #[serde(default)]
    pub party_name: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub bank_account_num: String,
    #[serde(default)]
    pub desc: String,
    pub total_amount: f64,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub status: EntryStatus,
}

/// `None` for blank input, otherwise the trimmed text.
fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_owned())
    }
}

impl EntryForm {
    fn parse_category(&self) -> Result<Category, Error> {
        Category::from_slug(&self.category)
            .ok_or_else(|| Error::UnknownCategory(self.category.clone()))
    }

    /// Convert the form into the fields for a new entry.
    ///
    /// # Errors
    /// Returns [Error::UnknownCategory] if the category is not a valid slug.
    pub fn into_new_entry(self) -> Result<NewEntry, Error> {
        let category = self.parse_category()?;

        Ok(NewEntry {
            category,
            date: self.date,
            transaction_date: non_empty(self.transaction_date),
            ref_no: self.ref_no,
            party_name: self.party_name,
            bank_name: non_empty(self.bank_name),
            bank_account_num: non_empty(self.bank_account_num),
            desc: self.desc,
            total_amount: self.total_amount,
            due_date: non_empty(self.due_date),
            status: Some(self.status),
            confirmed_by: None,
        })
    }

    /// Convert the form into an update that replaces every editable field.
    ///
    /// Blank optional fields clear the stored value.
    ///
    /// # Errors
    /// Returns [Error::UnknownCategory] if the category is not a valid slug.
    pub fn into_update(self) -> Result<(Category, EntryUpdate), Error> {
        let category = self.parse_category()?;

        let update = EntryUpdate {
            category: Some(category),
            date: Some(self.date),
            transaction_date: Some(non_empty(self.transaction_date)),
            ref_no: Some(self.ref_no),
            party_name: Some(self.party_name),
            bank_name: Some(non_empty(self.bank_name)),
            bank_account_num: Some(non_empty(self.bank_account_num)),
            desc: Some(self.desc),
            total_amount: Some(self.total_amount),
            due_date: Some(non_empty(self.due_date)),
            status: Some(self.status),
        };

        Ok((category, update))
    }
}

/// The values the entry form is filled with.
pub struct EntryFormDefaults<'a> {
    pub category: Category,
    pub date: &'a str,
    pub entry: Option<&'a Entry>,
}

/// The input type for a stored date.
///
/// Dates that are not plain `YYYY-MM-DD` are shown in a text input, a date
/// input would render them blank.
fn date_input_type(date: &str) -> &'static str {
    if date.is_empty() || (date.len() == 10 && parse_entry_date(date).is_some()) {
        "date"
    } else {
        "text"
    }
}

/// The inputs of the entry form, without the surrounding form element.
pub fn entry_form_fields(defaults: &EntryFormDefaults<'_>) -> Markup {
    let entry = defaults.entry;

    let transaction_date = entry.and_then(|e| e.transaction_date.as_deref()).unwrap_or_default();
    let ref_no = entry.map(|e| e.ref_no.as_str()).unwrap_or_default();
    let party_name = entry.map(|e| e.party_name.as_str()).unwrap_or_default();
    let bank_name = entry.and_then(|e| e.bank_name.as_deref()).unwrap_or_default();
    let bank_account_num = entry.and_then(|e| e.bank_account_num.as_deref()).unwrap_or_default();
    let desc = entry.map(|e| e.desc.as_str()).unwrap_or_default();
    let due_date = entry.and_then(|e| e.due_date.as_deref()).unwrap_or_default();
    let total_amount = entry.map(|e| e.total_amount.to_string());
    let status = entry.map_or(EntryStatus::default(), |e| e.status);

    html! {
        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in Category::ALL {
                    option value=(category.slug()) selected[category == defaults.category]
                    {
                        (category.label())
                    }
                }
            }
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type=(date_input_type(defaults.date))
                    value=(defaults.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="transaction_date" class=(FORM_LABEL_STYLE) { "Transaction Date" }

                input
                    name="transaction_date"
                    id="transaction_date"
                    type=(date_input_type(transaction_date))
                    value=(transaction_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="party_name" class=(FORM_LABEL_STYLE) { "Party Name" }

            input
                name="party_name"
                id="party_name"
                type="text"
                placeholder="Party Name"
                value=(party_name)
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="ref_no" class=(FORM_LABEL_STYLE) { "Reference No." }

            input
                name="ref_no"
                id="ref_no"
                type="text"
                placeholder="Cheque or invoice number"
                value=(ref_no)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="bank_name" class=(FORM_LABEL_STYLE) { "Bank" }

                input
                    name="bank_name"
                    id="bank_name"
                    type="text"
                    list="bank-list"
                    value=(bank_name)
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="bank-list"
                {
                    @for bank in BANK_LIST {
                        option value=(bank) {}
                    }
                }
            }

            div
            {
                label for="bank_account_num" class=(FORM_LABEL_STYLE) { "Account No." }

                input
                    name="bank_account_num"
                    id="bank_account_num"
                    type="text"
                    value=(bank_account_num)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="total_amount" class=(FORM_LABEL_STYLE) { "Total Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="total_amount"
                    id="total_amount"
                    type="number"
                    step="any"
                    placeholder="0.00"
                    required
                    value=[total_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="due_date" class=(FORM_LABEL_STYLE) { "Due Date" }

                input
                    name="due_date"
                    id="due_date"
                    type=(date_input_type(due_date))
                    value=(due_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                select name="status" id="status" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in EntryStatus::ALL {
                        option value=(option.label()) selected[option == status]
                        {
                            (option.label())
                        }
                    }
                }
            }
        }

        div
        {
            label for="desc" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="desc"
                id="desc"
                type="text"
                placeholder="Description"
                value=(desc)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
