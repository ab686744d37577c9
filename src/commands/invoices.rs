use serde::Deserialize;
use tauri::AppHandle;

use super::{AppStateExt, DesktopSession};
use crate::editor::ItemPatch;
use crate::models::{Invoice, InvoiceItem, InvoiceStatus};
use crate::session::EditorSnapshot;
use crate::store::Saved;
use crate::totals::{compute_totals, Totals};

/// Header fields of the open draft; `None` leaves a field alone.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDetails {
    pub invoice_number: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<Option<String>>,
}

fn open_editor(session: &DesktopSession) -> Result<EditorSnapshot, String> {
    session
        .snapshot()
        .editor
        .ok_or_else(|| "No invoice is being edited".to_string())
}

#[tauri::command]
pub fn get_invoices(app: AppHandle, query: Option<String>) -> Result<Vec<Invoice>, String> {
    let mut session = app.session()?;
    if let Some(query) = query {
        session.set_invoice_search(&query);
    }

    Ok(session.visible_invoices().into_iter().cloned().collect())
}

#[tauri::command]
pub fn change_invoice_status(
    app: AppHandle,
    invoice_id: String,
    status: InvoiceStatus,
) -> Result<Option<Invoice>, String> {
    let mut session = app.session()?;
    session
        .change_status(&invoice_id, status)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn open_invoice_editor(
    app: AppHandle,
    invoice_id: Option<String>,
) -> Result<Option<EditorSnapshot>, String> {
    let mut session = app.session()?;

    match invoice_id {
        Some(id) => {
            if !session.open_invoice(&id).map_err(|e| e.to_string())? {
                return Ok(None);
            }
        }
        None => session.open_new_invoice().map_err(|e| e.to_string())?,
    }

    Ok(session.snapshot().editor)
}

#[tauri::command]
pub fn editor_select_client(app: AppHandle, client_id: String) -> Result<EditorSnapshot, String> {
    let mut session = app.session()?;
    let editor = session
        .editor_mut()
        .ok_or_else(|| "No invoice is being edited".to_string())?;
    editor
        .select_client(&client_id)
        .map_err(|e| e.to_string())?;

    open_editor(&session)
}

#[tauri::command]
pub fn editor_update_details(
    app: AppHandle,
    details: InvoiceDetails,
) -> Result<EditorSnapshot, String> {
    let mut session = app.session()?;
    let editor = session
        .editor_mut()
        .ok_or_else(|| "No invoice is being edited".to_string())?;

    if let Some(number) = details.invoice_number {
        editor.set_invoice_number(&number);
    }
    if let Some(date) = details.issue_date {
        editor.set_issue_date(&date);
    }
    if let Some(date) = details.due_date {
        editor.set_due_date(&date);
    }
    if let Some(status) = details.status {
        editor.set_status(status);
    }
    if let Some(notes) = details.notes {
        editor.set_notes(notes);
    }

    open_editor(&session)
}

#[tauri::command]
pub fn editor_add_item(app: AppHandle) -> Result<EditorSnapshot, String> {
    let mut session = app.session()?;
    session
        .editor_mut()
        .ok_or_else(|| "No invoice is being edited".to_string())?
        .add_item();

    open_editor(&session)
}

#[tauri::command]
pub fn editor_update_item(
    app: AppHandle,
    item_id: String,
    patch: ItemPatch,
) -> Result<EditorSnapshot, String> {
    let mut session = app.session()?;
    session
        .editor_mut()
        .ok_or_else(|| "No invoice is being edited".to_string())?
        .update_item(&item_id, patch)
        .map_err(|e| e.to_string())?;

    open_editor(&session)
}

#[tauri::command]
pub fn editor_remove_item(app: AppHandle, item_id: String) -> Result<EditorSnapshot, String> {
    let mut session = app.session()?;
    session
        .editor_mut()
        .ok_or_else(|| "No invoice is being edited".to_string())?
        .remove_item(&item_id);

    open_editor(&session)
}

#[tauri::command]
pub fn preview_totals(items: Vec<InvoiceItem>) -> Totals {
    compute_totals(&items)
}

#[tauri::command]
pub fn save_invoice(app: AppHandle) -> Result<Saved<Invoice>, String> {
    let mut session = app.session()?;
    session.save_editor().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cancel_invoice_editor(app: AppHandle) -> Result<(), String> {
    let mut session = app.session()?;
    session.cancel_editor();
    Ok(())
}
