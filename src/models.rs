use serde::{Deserialize, Serialize};
use std::fmt;

use crate::totals::{compute_totals, Totals};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub company_name: String,
    #[serde(default)]
    pub company_address: Option<String>,
    pub tax_rate: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub invoice_background: Option<String>,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub invoice_text_color: Option<String>,
}

impl User {
    /// A fresh profile carrying the configured locale defaults.
    pub fn new(id: &str, name: &str, email: &str, currency: &str, tax_rate: f64) -> Self {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            avatar: None,
            company_name: String::new(),
            company_address: None,
            tax_rate,
            currency: currency.to_string(),
            invoice_background: None,
            company_logo: None,
            upi_id: None,
            invoice_text_color: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub company: Option<String>,
}

impl Client {
    /// Quick-add shape: only a name, the store assigns the id.
    pub fn named(name: &str) -> Self {
        Client {
            id: String::new(),
            name: name.to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            company: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemUnit {
    #[default]
    Unit,
    Kg,
    Liter,
    Gram,
    Box,
    Hour,
    Day,
    Packet,
}

impl ItemUnit {
    pub const ALL: [ItemUnit; 8] = [
        ItemUnit::Unit,
        ItemUnit::Kg,
        ItemUnit::Liter,
        ItemUnit::Gram,
        ItemUnit::Box,
        ItemUnit::Hour,
        ItemUnit::Day,
        ItemUnit::Packet,
    ];

    /// Label shown in the unit picker.
    pub fn label(&self) -> &'static str {
        match self {
            ItemUnit::Unit => "Unit",
            ItemUnit::Kg => "kg",
            ItemUnit::Liter => "Liter",
            ItemUnit::Gram => "Gram",
            ItemUnit::Box => "Box",
            ItemUnit::Hour => "Hour",
            ItemUnit::Day => "Day",
            ItemUnit::Packet => "Packet",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub item_number: u32,
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: ItemUnit,
    pub price: f64,
    /// Percentage, e.g. `18.0` for 18%.
    pub tax: f64,
}

impl InvoiceItem {
    pub fn line_amount(&self) -> f64 {
        self.quantity * self.price
    }

    pub fn line_tax(&self) -> f64 {
        self.line_amount() * self.tax / 100.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub due_date: String,
    pub issue_date: String,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub tax_total: f64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Invoice {
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items)
    }

    /// Overwrites the derived money fields from the current items.
    pub fn recalculate(&mut self) {
        let totals = self.totals();
        self.sub_total = totals.sub_total;
        self.tax_total = totals.tax_total;
        self.total_amount = totals.total_amount;
    }

    pub fn with_status(&self, status: InvoiceStatus) -> Invoice {
        Invoice {
            status,
            ..self.clone()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_invoices: usize,
    pub pending_count: usize,
    pub pending_amount: f64,
    pub paid_count: usize,
    pub paid_amount: f64,
    pub overdue_count: usize,
    pub overdue_amount: f64,
}
