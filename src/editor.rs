use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Client, Invoice, InvoiceItem, InvoiceStatus, ItemUnit, User};
use crate::totals::Totals;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Create,
    Edit,
}

/// Partial update of a line item; `None` leaves the field alone.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<ItemUnit>,
    pub price: Option<f64>,
    pub tax: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct InvoiceEditor {
    mode: EditorMode,
    draft: Invoice,
    clients: Vec<Client>,
    default_tax: f64,
    currency: String,
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("{field} must be a YYYY-MM-DD date, got {raw:?}")))
}

/// `PREFIX-NNNN` following the highest number already issued under `prefix`.
pub fn next_invoice_number(invoices: &[Invoice], prefix: &str) -> String {
    let lead = format!("{prefix}-");
    let highest = invoices
        .iter()
        .filter_map(|inv| inv.invoice_number.strip_prefix(&lead))
        .filter_map(|rest| rest.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{}-{:0>4}", prefix, highest.saturating_add(1))
}

impl InvoiceEditor {
    pub fn create(
        user: &User,
        clients: &[Client],
        invoice_number: String,
        issue_date: NaiveDate,
        payment_terms_days: i64,
    ) -> Self {
        let due_date = u64::try_from(payment_terms_days)
            .ok()
            .and_then(|days| issue_date.checked_add_days(Days::new(days)))
            .unwrap_or(issue_date);

        let mut editor = InvoiceEditor {
            mode: EditorMode::Create,
            draft: Invoice {
                id: String::new(),
                invoice_number,
                client_id: String::new(),
                client_name: String::new(),
                client_address: None,
                client_phone: None,
                due_date: format_date(due_date),
                issue_date: format_date(issue_date),
                items: Vec::new(),
                status: InvoiceStatus::Draft,
                sub_total: 0.0,
                tax_total: 0.0,
                total_amount: 0.0,
                notes: None,
            },
            clients: clients.to_vec(),
            default_tax: user.tax_rate,
            currency: user.currency.clone(),
        };
        editor.add_item();
        editor
    }

    pub fn edit(invoice: &Invoice, clients: &[Client], user: &User) -> Self {
        InvoiceEditor {
            mode: EditorMode::Edit,
            draft: invoice.clone(),
            clients: clients.to_vec(),
            default_tax: user.tax_rate,
            currency: user.currency.clone(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &Invoice {
        &self.draft
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn select_client(&mut self, client_id: &str) -> Result<()> {
        let client = self
            .clients
            .iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| AppError::Validation(format!("unknown client {client_id}")))?;

        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        self.draft.client_id = client.id.clone();
        self.draft.client_name = client.name.clone();
        self.draft.client_address = non_empty(&client.address);
        self.draft.client_phone = non_empty(&client.phone);
        Ok(())
    }

    pub fn set_invoice_number(&mut self, number: &str) {
        self.draft.invoice_number = number.trim().to_string();
    }

    pub fn set_issue_date(&mut self, date: &str) {
        self.draft.issue_date = date.to_string();
    }

    pub fn set_due_date(&mut self, date: &str) {
        self.draft.due_date = date.to_string();
    }

    pub fn set_status(&mut self, status: InvoiceStatus) {
        self.draft.status = status;
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.draft.notes = notes.filter(|n| !n.trim().is_empty());
    }

    /// Appends a blank line numbered after the current highest item number.
    pub fn add_item(&mut self) -> &InvoiceItem {
        let item_number = self
            .draft
            .items
            .iter()
            .map(|item| item.item_number)
            .max()
            .unwrap_or(0)
            + 1;

        self.draft.items.push(InvoiceItem {
            id: Uuid::new_v4().to_string(),
            item_number,
            name: String::new(),
            quantity: 1.0,
            unit: ItemUnit::Unit,
            price: 0.0,
            tax: self.default_tax,
        });

        &self.draft.items[self.draft.items.len() - 1]
    }

    pub fn update_item(&mut self, item_id: &str, patch: ItemPatch) -> Result<()> {
        let item = self
            .draft
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| AppError::Validation(format!("unknown item {item_id}")))?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            item.unit = unit;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(tax) = patch.tax {
            item.tax = tax;
        }
        Ok(())
    }

    /// Remaining items keep their numbers.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.draft.items.len();
        self.draft.items.retain(|item| item.id != item_id);
        self.draft.items.len() != before
    }

    pub fn totals(&self) -> Totals {
        self.draft.totals()
    }

    fn validate(&self) -> Result<()> {
        let draft = &self.draft;

        if draft.client_name.trim().is_empty() {
            return Err(AppError::Validation("Please select a client".to_string()));
        }
        if draft.invoice_number.trim().is_empty() {
            return Err(AppError::Validation("Invoice number is required".to_string()));
        }

        let issued = parse_date("Issue date", &draft.issue_date)?;
        let due = parse_date("Due date", &draft.due_date)?;
        if due < issued {
            return Err(AppError::Validation(
                "Due date cannot be before the issue date".to_string(),
            ));
        }

        for item in &draft.items {
            if item.name.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "Item {} needs a name",
                    item.item_number
                )));
            }
            let numbers = [item.quantity, item.price, item.tax];
            if numbers.iter().any(|n| !n.is_finite() || *n < 0.0) {
                return Err(AppError::Validation(format!(
                    "Item {} has a negative or invalid amount",
                    item.item_number
                )));
            }
        }

        Ok(())
    }

    /// The invoice ready to persist: validated, totals filled in, id assigned when new.
    pub fn finish(&self) -> Result<Invoice> {
        self.validate()?;

        let mut invoice = self.draft.clone();
        if self.mode == EditorMode::Create && invoice.id.is_empty() {
            invoice.id = Uuid::new_v4().to_string();
        }
        invoice.recalculate();
        Ok(invoice)
    }
}
