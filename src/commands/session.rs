use super::AppStateExt;
use crate::models::User;
use crate::session::{SessionSnapshot, Tab};
use tauri::AppHandle;

#[tauri::command]
pub fn restore_session(app: AppHandle) -> Result<SessionSnapshot, String> {
    let mut session = app.session()?;
    session.restore().map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

#[tauri::command]
pub fn login(app: AppHandle, user: User) -> Result<SessionSnapshot, String> {
    let mut session = app.session()?;
    session.login(user).map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

#[tauri::command]
pub fn logout(app: AppHandle) -> Result<SessionSnapshot, String> {
    let mut session = app.session()?;
    session.logout();
    Ok(session.snapshot())
}

#[tauri::command]
pub fn get_snapshot(app: AppHandle) -> Result<SessionSnapshot, String> {
    let session = app.session()?;
    Ok(session.snapshot())
}

#[tauri::command]
pub fn set_active_tab(app: AppHandle, tab: Tab) -> Result<SessionSnapshot, String> {
    let mut session = app.session()?;
    session.set_tab(tab);
    Ok(session.snapshot())
}

#[tauri::command]
pub fn dismiss_notification(app: AppHandle) -> Result<(), String> {
    let mut session = app.session()?;
    session.dismiss_notification();
    Ok(())
}
