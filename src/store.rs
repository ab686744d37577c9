use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Client, DashboardStats, Invoice, User};
use crate::stats;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// A stored record together with whether the save inserted or replaced it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Saved<T> {
    pub record: T,
    pub outcome: SaveOutcome,
}

impl<T> Saved<T> {
    pub fn is_created(&self) -> bool {
        self.outcome == SaveOutcome::Created
    }
}

/// Persistence boundary for the session. Everything is scoped by user id.
pub trait Store {
    fn session_uid(&self) -> Result<Option<String>>;

    fn set_session_uid(&self, uid: Option<&str>) -> Result<()>;

    fn current_user_data(&self, uid: &str) -> Result<Option<User>>;

    fn create_user(&self, user: &User) -> Result<User>;

    /// Fails with `AppError::UnknownUser` when `uid` has no profile.
    fn update_user(&self, uid: &str, user: &User) -> Result<()>;

    fn invoices(&self, uid: &str) -> Result<Vec<Invoice>>;

    fn clients(&self, uid: &str) -> Result<Vec<Client>>;

    /// Assigns an id when empty and recomputes the money fields before storing.
    fn save_invoice(&self, uid: &str, invoice: Invoice) -> Result<Saved<Invoice>>;

    fn save_client(&self, uid: &str, client: Client) -> Result<Saved<Client>>;

    fn calculate_stats(&self, invoices: &[Invoice]) -> DashboardStats {
        stats::calculate_stats(invoices)
    }
}
