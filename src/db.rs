use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Client, Invoice, User};
use crate::store::{SaveOutcome, Saved, Store};

const SESSION_UID_KEY: &str = "session_uid";

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened invoice database");

        let db = Database {
            conn: Mutex::new(conn),
        };
        db.initialize()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Database {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        db.initialize()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| AppError::Poisoned)
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            -- Key/value pairs that outlive a session (currently only the session uid)
            CREATE TABLE IF NOT EXISTS app_meta (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );

            -- User profiles
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                data_json TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Clients, scoped by owner
            CREATE TABLE IF NOT EXISTS clients (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                data_json TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            -- Invoices, scoped by owner; the full record lives in data_json
            CREATE TABLE IF NOT EXISTS invoices (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                invoice_number TEXT NOT NULL,
                client_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Draft',
                total_amount REAL NOT NULL DEFAULT 0,
                data_json TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_clients_user ON clients(user_id);
            CREATE INDEX IF NOT EXISTS idx_invoices_user ON invoices(user_id);
            ",
        )?;

        // Pass the held connection so the migration does not lock again
        Self::migrate_conn(&conn)?;

        Ok(())
    }

    fn migrate_conn(conn: &Connection) -> Result<()> {
        let columns: Vec<String> = conn
            .prepare("PRAGMA table_info(invoices)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();

        if !columns.contains(&"status".to_string()) {
            conn.execute(
                "ALTER TABLE invoices ADD COLUMN status TEXT NOT NULL DEFAULT 'Draft'",
                [],
            )?;
        }
        if !columns.contains(&"total_amount".to_string()) {
            conn.execute(
                "ALTER TABLE invoices ADD COLUMN total_amount REAL NOT NULL DEFAULT 0",
                [],
            )?;
        }
        if !columns.contains(&"updated_at".to_string()) {
            conn.execute("ALTER TABLE invoices ADD COLUMN updated_at DATETIME", [])?;
        }

        Ok(())
    }

    fn owner_of(conn: &Connection, table: &str, id: &str) -> Result<Option<String>> {
        let owner = conn
            .query_row(
                &format!("SELECT user_id FROM {table} WHERE id = ?1"),
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(owner)
    }
}

fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<String>) -> Result<Vec<T>> {
    rows.iter()
        .map(|json| serde_json::from_str(json).map_err(AppError::from))
        .collect()
}

impl Store for Database {
    fn session_uid(&self) -> Result<Option<String>> {
        let conn = self.lock()?;
        let uid = conn
            .query_row(
                "SELECT value FROM app_meta WHERE key = ?1",
                [SESSION_UID_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(uid)
    }

    fn set_session_uid(&self, uid: Option<&str>) -> Result<()> {
        let conn = self.lock()?;
        match uid {
            Some(uid) => {
                conn.execute(
                    "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![SESSION_UID_KEY, uid],
                )?;
            }
            None => {
                conn.execute("DELETE FROM app_meta WHERE key = ?1", [SESSION_UID_KEY])?;
            }
        }
        Ok(())
    }

    fn current_user_data(&self, uid: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        let json: Option<String> = conn
            .query_row("SELECT data_json FROM users WHERE id = ?1", [uid], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    fn create_user(&self, user: &User) -> Result<User> {
        let mut created = user.clone();
        if created.id.is_empty() {
            created.id = Uuid::new_v4().to_string();
        }

        let json = serde_json::to_string(&created)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (id, name, email, data_json) VALUES (?1, ?2, ?3, ?4)",
            params![created.id, created.name, created.email, json],
        )?;

        info!(uid = %created.id, "created user profile");
        Ok(created)
    }

    fn update_user(&self, uid: &str, user: &User) -> Result<()> {
        let mut stored = user.clone();
        stored.id = uid.to_string();

        let json = serde_json::to_string(&stored)?;
        let conn = self.lock()?;
        conn.execute(
            "UPDATE users SET name = ?1, email = ?2, data_json = ?3 WHERE id = ?4",
            params![stored.name, stored.email, json, uid],
        )?;

        if conn.changes() == 0 {
            return Err(AppError::UnknownUser(uid.to_string()));
        }

        debug!(uid, "updated user profile");
        Ok(())
    }

    fn invoices(&self, uid: &str) -> Result<Vec<Invoice>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT data_json FROM invoices WHERE user_id = ?1 ORDER BY seq")?;

        let rows = stmt
            .query_map([uid], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        decode_rows(rows)
    }

    fn clients(&self, uid: &str) -> Result<Vec<Client>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT data_json FROM clients WHERE user_id = ?1 ORDER BY seq")?;

        let rows = stmt
            .query_map([uid], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        decode_rows(rows)
    }

    fn save_invoice(&self, uid: &str, invoice: Invoice) -> Result<Saved<Invoice>> {
        let mut record = invoice;
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        record.recalculate();

        let json = serde_json::to_string(&record)?;
        let conn = self.lock()?;

        let outcome = match Self::owner_of(&conn, "invoices", &record.id)? {
            Some(owner) if owner != uid => return Err(AppError::NotOwned(record.id)),
            Some(_) => {
                conn.execute(
                    "UPDATE invoices
                     SET invoice_number = ?1, client_id = ?2, status = ?3, total_amount = ?4,
                         data_json = ?5, updated_at = CURRENT_TIMESTAMP
                     WHERE id = ?6 AND user_id = ?7",
                    params![
                        record.invoice_number,
                        record.client_id,
                        record.status.as_str(),
                        record.total_amount,
                        json,
                        record.id,
                        uid,
                    ],
                )?;
                SaveOutcome::Updated
            }
            None => {
                conn.execute(
                    "INSERT INTO invoices (id, user_id, invoice_number, client_id, status, total_amount, data_json)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        record.id,
                        uid,
                        record.invoice_number,
                        record.client_id,
                        record.status.as_str(),
                        record.total_amount,
                        json,
                    ],
                )?;
                SaveOutcome::Created
            }
        };

        debug!(uid, invoice_id = %record.id, ?outcome, "saved invoice");
        Ok(Saved { record, outcome })
    }

    fn save_client(&self, uid: &str, client: Client) -> Result<Saved<Client>> {
        let mut record = client;
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }

        let json = serde_json::to_string(&record)?;
        let conn = self.lock()?;

        let outcome = match Self::owner_of(&conn, "clients", &record.id)? {
            Some(owner) if owner != uid => return Err(AppError::NotOwned(record.id)),
            Some(_) => {
                conn.execute(
                    "UPDATE clients SET name = ?1, data_json = ?2 WHERE id = ?3 AND user_id = ?4",
                    params![record.name, json, record.id, uid],
                )?;
                SaveOutcome::Updated
            }
            None => {
                conn.execute(
                    "INSERT INTO clients (id, user_id, name, data_json) VALUES (?1, ?2, ?3, ?4)",
                    params![record.id, uid, record.name, json],
                )?;
                SaveOutcome::Created
            }
        };

        debug!(uid, client_id = %record.id, ?outcome, "saved client");
        Ok(Saved { record, outcome })
    }
}

#[cfg(feature = "desktop")]
mod app {
    use super::Database;
    use crate::config::AppConfig;
    use crate::error::{AppError, Result};
    use tauri::{AppHandle, Manager};

    impl Database {
        /// Opens the database inside the platform app data directory.
        pub fn for_app(app_handle: &AppHandle, config: &AppConfig) -> Result<Self> {
            let app_dir = app_handle
                .path()
                .app_data_dir()
                .map_err(|e| AppError::Config(format!("no app data dir: {e}")))?;

            Database::open(&config.resolve_db_path(&app_dir))
        }
    }
}
