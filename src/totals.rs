use serde::{Deserialize, Serialize};

use crate::models::InvoiceItem;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub sub_total: f64,
    pub tax_total: f64,
    pub total_amount: f64,
}

/// Sums line amounts and per-line tax. Tax is a percentage of each line.
pub fn compute_totals(items: &[InvoiceItem]) -> Totals {
    let (sub_total, tax_total) = items.iter().fold((0.0, 0.0), |(sub, tax), item| {
        (sub + item.line_amount(), tax + item.line_tax())
    });

    Totals {
        sub_total,
        tax_total,
        total_amount: sub_total + tax_total,
    }
}
