use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::editor::{next_invoice_number, today, EditorMode, InvoiceEditor};
use crate::error::{AppError, Result};
use crate::filter::{filter_clients, filter_invoices};
use crate::models::{Client, DashboardStats, Invoice, InvoiceStatus, User};
use crate::notify::Notification;
use crate::store::{Saved, Store};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Invoices,
    Clients,
    Settings,
}

/// Invoices and clients fetched for one user, not yet applied to a session.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub uid: String,
    pub invoices: Vec<Invoice>,
    pub clients: Vec<Client>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub mode: EditorMode,
    pub invoice: Invoice,
    pub currency: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub user: Option<User>,
    pub active_tab: Tab,
    pub editor: Option<EditorSnapshot>,
    pub stats: DashboardStats,
    pub invoice_search: String,
    pub notification: Option<Notification>,
}

/// Everything the dashboard knows about the signed-in user.
///
/// State changes only after the store confirms the write, so a failed
/// operation leaves the in-memory collections exactly as they were.
pub struct Session<S: Store> {
    store: S,
    config: AppConfig,
    loading: bool,
    user: Option<User>,
    invoices: Vec<Invoice>,
    clients: Vec<Client>,
    stats: DashboardStats,
    active_tab: Tab,
    editor: Option<InvoiceEditor>,
    invoice_search: String,
    notification: Option<Notification>,
}

impl<S: Store> Session<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Session {
            store,
            config,
            loading: true,
            user: None,
            invoices: Vec::new(),
            clients: Vec::new(),
            stats: DashboardStats::default(),
            active_tab: Tab::Dashboard,
            editor: None,
            invoice_search: String::new(),
            notification: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    fn current_uid(&self) -> Result<String> {
        self.user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(AppError::NotAuthenticated)
    }

    // ----- notifications -----

    fn notify(&mut self, notification: Notification) {
        debug!(message = %notification.message, kind = ?notification.kind, "notification");
        self.notification = Some(notification);
    }

    /// The current notification unless it has outlived the configured lifetime.
    pub fn notification_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        let ttl = self.config.notification_ttl();
        self.notification
            .as_ref()
            .filter(|n| !n.is_expired(now, ttl))
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification_at(Utc::now())
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    // ----- session lifecycle -----

    /// Resumes a stored session, if any. Returns whether a user is signed in.
    pub fn restore(&mut self) -> Result<bool> {
        let result = self.try_restore();
        self.loading = false;

        if let Err(e) = &result {
            error!(error = %e, "failed to restore session");
            self.notify(Notification::error("Error loading local data"));
        }
        result
    }

    fn try_restore(&mut self) -> Result<bool> {
        let Some(uid) = self.store.session_uid()? else {
            debug!("no stored session");
            return Ok(false);
        };

        let Some(user) = self.store.current_user_data(&uid)? else {
            warn!(uid = %uid, "stored session points at a missing profile");
            return Ok(false);
        };

        info!(uid = %uid, "restored session");
        self.clear_user_state();
        self.user = Some(user);
        // A failed load leaves the session signed in with empty lists.
        if let Err(e) = self.load_user_data(&uid) {
            debug!(uid = %uid, error = %e, "restored without user data");
        }
        Ok(true)
    }

    pub fn login(&mut self, user: User) -> Result<()> {
        let user = match self.establish(user) {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "sign in failed");
                self.notify(Notification::error("Sign in failed"));
                return Err(e);
            }
        };

        info!(uid = %user.id, "signed in");
        let uid = user.id.clone();
        let greeting = format!("Welcome, {}!", user.name);
        self.clear_user_state();
        self.user = Some(user);
        self.loading = false;

        if self.load_user_data(&uid).is_ok() {
            self.notify(Notification::success(greeting));
        }
        Ok(())
    }

    /// Stored profile for `user.id`, created on first sign in.
    fn establish(&self, user: User) -> Result<User> {
        let stored = match self.store.current_user_data(&user.id)? {
            Some(existing) => existing,
            None => {
                let mut fresh = user;
                if fresh.currency.trim().is_empty() {
                    fresh.currency = self.config.default_currency.clone();
                }
                self.store.create_user(&fresh)?
            }
        };
        self.store.set_session_uid(Some(stored.id.as_str()))?;
        Ok(stored)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.set_session_uid(None) {
            warn!(error = %e, "could not clear stored session");
        }

        if let Some(user) = &self.user {
            info!(uid = %user.id, "signed out");
        }

        self.user = None;
        self.clear_user_state();
        self.notify(Notification::success("Logged out successfully"));
    }

    /// Drops everything loaded for the previous user and resets the view.
    fn clear_user_state(&mut self) {
        self.invoices.clear();
        self.clients.clear();
        self.stats = DashboardStats::default();
        self.active_tab = Tab::Dashboard;
        self.editor = None;
        self.invoice_search.clear();
    }

    /// Reads both collections for `uid`. Does not touch the session.
    pub fn fetch_user_data(&self, uid: &str) -> Result<LoadedData> {
        let invoices = self.store.invoices(uid)?;
        let clients = self.store.clients(uid)?;
        Ok(LoadedData {
            uid: uid.to_string(),
            invoices,
            clients,
        })
    }

    /// Installs fetched data. Returns `false` and drops it when the session
    /// has since moved to another user or signed out.
    pub fn apply_loaded(&mut self, data: LoadedData) -> bool {
        let current = self.user.as_ref().map(|u| u.id.as_str());
        if current != Some(data.uid.as_str()) {
            debug!(uid = %data.uid, "discarding stale load");
            return false;
        }

        self.stats = self.store.calculate_stats(&data.invoices);
        self.invoices = data.invoices;
        self.clients = data.clients;
        true
    }

    pub fn load_user_data(&mut self, uid: &str) -> Result<()> {
        match self.fetch_user_data(uid) {
            Ok(data) => {
                debug!(
                    uid,
                    invoices = data.invoices.len(),
                    clients = data.clients.len(),
                    "loaded user data"
                );
                self.apply_loaded(data);
                Ok(())
            }
            Err(e) => {
                error!(uid = %uid, error = %e, "failed to load user data");
                self.notify(Notification::error("Error loading local data"));
                Err(e)
            }
        }
    }

    pub fn update_profile(&mut self, user: User) -> Result<()> {
        let uid = self.current_uid()?;

        match self.store.update_user(&uid, &user) {
            Ok(()) => {
                self.user = Some(User { id: uid, ..user });
                self.notify(Notification::success("Profile updated"));
                Ok(())
            }
            Err(e) => {
                error!(uid = %uid, error = %e, "profile update failed");
                self.notify(Notification::error("Failed to update profile"));
                Err(e)
            }
        }
    }

    // ----- views -----

    /// Switching tabs closes the editor overlay.
    pub fn set_tab(&mut self, tab: Tab) {
        self.editor = None;
        self.active_tab = tab;
    }

    pub fn set_invoice_search(&mut self, query: &str) {
        self.invoice_search = query.to_string();
    }

    pub fn invoice_search(&self) -> &str {
        &self.invoice_search
    }

    pub fn visible_invoices(&self) -> Vec<&Invoice> {
        filter_invoices(&self.invoices, &self.invoice_search)
    }

    pub fn search_clients(&self, query: &str) -> Vec<&Client> {
        filter_clients(&self.clients, query)
    }

    // ----- invoices -----

    fn replace_or_push(&mut self, invoice: Invoice) {
        match self.invoices.iter_mut().find(|inv| inv.id == invoice.id) {
            Some(slot) => *slot = invoice,
            None => self.invoices.push(invoice),
        }
        self.stats = self.store.calculate_stats(&self.invoices);
    }

    /// Returns the updated invoice, or `None` when no invoice has that id.
    pub fn change_status(
        &mut self,
        invoice_id: &str,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>> {
        let uid = self.current_uid()?;

        let Some(invoice) = self.invoices.iter().find(|inv| inv.id == invoice_id) else {
            debug!(invoice_id, "status change for unknown invoice ignored");
            return Ok(None);
        };
        let updated = invoice.with_status(status);

        match self.store.save_invoice(&uid, updated) {
            Ok(saved) => {
                info!(invoice_id, status = %status, "invoice status changed");
                self.replace_or_push(saved.record.clone());
                self.notify(Notification::success(format!("Status: {status}")));
                Ok(Some(saved.record))
            }
            Err(e) => {
                error!(invoice_id, error = %e, "status change failed");
                self.notify(Notification::error("Update failed"));
                Err(e)
            }
        }
    }

    /// Persists `invoice`. On success the editor closes and the Invoices tab
    /// opens, whether or not `invoice` came from the open draft.
    pub fn save_invoice(&mut self, invoice: Invoice) -> Result<Saved<Invoice>> {
        let uid = self.current_uid()?;

        match self.store.save_invoice(&uid, invoice) {
            Ok(saved) => {
                self.replace_or_push(saved.record.clone());
                self.editor = None;
                self.active_tab = Tab::Invoices;
                let message = if saved.is_created() {
                    "Invoice created!"
                } else {
                    "Invoice updated!"
                };
                self.notify(Notification::success(message));
                Ok(saved)
            }
            Err(e) => {
                error!(uid = %uid, error = %e, "invoice save failed");
                self.notify(Notification::error("Failed to save invoice"));
                Err(e)
            }
        }
    }

    // ----- editor overlay -----

    pub fn open_new_invoice(&mut self) -> Result<()> {
        let user = self.user.as_ref().ok_or(AppError::NotAuthenticated)?;
        let number = next_invoice_number(&self.invoices, &self.config.invoice_prefix);

        self.editor = Some(InvoiceEditor::create(
            user,
            &self.clients,
            number,
            today(),
            self.config.payment_terms_days,
        ));
        Ok(())
    }

    /// Opens an existing invoice. Unknown ids leave the view alone.
    pub fn open_invoice(&mut self, invoice_id: &str) -> Result<bool> {
        let user = self.user.as_ref().ok_or(AppError::NotAuthenticated)?;
        let Some(invoice) = self.invoices.iter().find(|inv| inv.id == invoice_id) else {
            return Ok(false);
        };

        self.editor = Some(InvoiceEditor::edit(invoice, &self.clients, user));
        Ok(true)
    }

    pub fn editor(&self) -> Option<&InvoiceEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut InvoiceEditor> {
        self.editor.as_mut()
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
    }

    /// Validates and saves the open draft. The editor stays open on failure.
    pub fn save_editor(&mut self) -> Result<Saved<Invoice>> {
        let editor = self
            .editor
            .as_ref()
            .ok_or_else(|| AppError::Validation("No invoice is being edited".to_string()))?;

        let invoice = match editor.finish() {
            Ok(invoice) => invoice,
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                return Err(e);
            }
        };

        self.save_invoice(invoice)
    }

    // ----- clients -----

    /// Quick add by name. A blank name does nothing.
    pub fn add_client(&mut self, name: &str) -> Result<Option<Client>> {
        let uid = self.current_uid()?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let result = self
            .store
            .save_client(&uid, Client::named(name))
            .and_then(|saved| Ok((saved.record, self.store.clients(&uid)?)));

        match result {
            Ok((client, clients)) => {
                info!(uid = %uid, client_id = %client.id, "client added");
                self.clients = clients;
                self.notify(Notification::success("Client added"));
                Ok(Some(client))
            }
            Err(e) => {
                error!(uid = %uid, error = %e, "client add failed");
                self.notify(Notification::error("Failed to add client"));
                Err(e)
            }
        }
    }

    pub fn save_client(&mut self, client: Client) -> Result<Saved<Client>> {
        let uid = self.current_uid()?;

        match self.store.save_client(&uid, client) {
            Ok(saved) => {
                match self.clients.iter_mut().find(|c| c.id == saved.record.id) {
                    Some(slot) => *slot = saved.record.clone(),
                    None => self.clients.push(saved.record.clone()),
                }
                self.notify(Notification::success("Client saved"));
                Ok(saved)
            }
            Err(e) => {
                error!(uid = %uid, error = %e, "client save failed");
                self.notify(Notification::error("Failed to save client"));
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            loading: self.loading,
            authenticated: self.is_authenticated(),
            user: self.user.clone(),
            active_tab: self.active_tab,
            editor: self.editor.as_ref().map(|editor| EditorSnapshot {
                mode: editor.mode(),
                invoice: editor.draft().clone(),
                currency: editor.currency().to_string(),
            }),
            stats: self.stats,
            invoice_search: self.invoice_search.clone(),
            notification: self.notification().cloned(),
        }
    }
}
