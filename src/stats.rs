use crate::models::{DashboardStats, Invoice, InvoiceStatus};

/// Single pass over the invoices. Drafts only count towards `total_invoices`.
pub fn calculate_stats(invoices: &[Invoice]) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for invoice in invoices {
        stats.total_invoices += 1;

        match invoice.status {
            InvoiceStatus::Pending => {
                stats.pending_count += 1;
                stats.pending_amount += invoice.total_amount;
            }
            InvoiceStatus::Paid => {
                stats.paid_count += 1;
                stats.paid_amount += invoice.total_amount;
            }
            InvoiceStatus::Overdue => {
                stats.overdue_count += 1;
                stats.overdue_amount += invoice.total_amount;
            }
            InvoiceStatus::Draft => {}
        }
    }

    stats
}
