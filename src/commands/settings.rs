use super::AppStateExt;
use crate::models::User;
use tauri::AppHandle;

#[tauri::command]
pub fn get_profile(app: AppHandle) -> Result<Option<User>, String> {
    let session = app.session()?;
    Ok(session.user().cloned())
}

#[tauri::command]
pub fn update_profile(app: AppHandle, user: User) -> Result<User, String> {
    let mut session = app.session()?;
    session.update_profile(user).map_err(|e| e.to_string())?;

    session
        .user()
        .cloned()
        .ok_or_else(|| "Not signed in".to_string())
}
