use super::AppStateExt;
use crate::models::Client;
use crate::store::Saved;
use tauri::AppHandle;

#[tauri::command]
pub fn get_clients(app: AppHandle, query: Option<String>) -> Result<Vec<Client>, String> {
    let session = app.session()?;
    let query = query.unwrap_or_default();

    Ok(session
        .search_clients(&query)
        .into_iter()
        .cloned()
        .collect())
}

#[tauri::command]
pub fn add_client(app: AppHandle, name: String) -> Result<Option<Client>, String> {
    let mut session = app.session()?;
    session.add_client(&name).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn save_client(app: AppHandle, client: Client) -> Result<Saved<Client>, String> {
    let mut session = app.session()?;
    session.save_client(client).map_err(|e| e.to_string())
}
