pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod session;
pub mod settings;

use std::sync::{Mutex, MutexGuard};
use tauri::{AppHandle, Manager};

use crate::db::Database;
use crate::session::Session;

pub type DesktopSession = Session<Database>;

pub struct AppState {
    pub session: Mutex<DesktopSession>,
}

impl AppState {
    pub fn new(session: DesktopSession) -> Self {
        AppState {
            session: Mutex::new(session),
        }
    }
}

pub trait AppStateExt {
    fn session(&self) -> Result<MutexGuard<'_, DesktopSession>, String>;
}

impl AppStateExt for AppHandle {
    fn session(&self) -> Result<MutexGuard<'_, DesktopSession>, String> {
        self.state::<AppState>()
            .inner()
            .session
            .lock()
            .map_err(|e| e.to_string())
    }
}
