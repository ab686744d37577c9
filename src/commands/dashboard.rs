use serde::Serialize;
use tauri::AppHandle;

use super::AppStateExt;
use crate::models::{DashboardStats, Invoice};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub invoices: Vec<Invoice>,
    pub currency: String,
}

#[tauri::command]
pub fn get_dashboard(app: AppHandle) -> Result<DashboardView, String> {
    let session = app.session()?;
    let user = session.user().ok_or_else(|| "Not signed in".to_string())?;

    Ok(DashboardView {
        stats: session.stats(),
        invoices: session.invoices().to_vec(),
        currency: user.currency.clone(),
    })
}
