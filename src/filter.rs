use crate::models::{Client, Invoice};

/// Case-insensitive substring match on invoice number or client name.
pub fn invoice_matches(invoice: &Invoice, query: &str) -> bool {
    let needle = query.to_lowercase();
    invoice.invoice_number.to_lowercase().contains(&needle)
        || invoice.client_name.to_lowercase().contains(&needle)
}

pub fn filter_invoices<'a>(invoices: &'a [Invoice], query: &str) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|inv| invoice_matches(inv, query))
        .collect()
}

pub fn client_matches(client: &Client, query: &str) -> bool {
    let needle = query.to_lowercase();
    client.name.to_lowercase().contains(&needle)
        || client.email.to_lowercase().contains(&needle)
        || client
            .company
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&needle))
}

pub fn filter_clients<'a>(clients: &'a [Client], query: &str) -> Vec<&'a Client> {
    clients
        .iter()
        .filter(|client| client_matches(client, query))
        .collect()
}
