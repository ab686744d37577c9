use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

pub const ENV_DB_FILE: &str = "INVOICE_DESK_DB_FILE";
pub const ENV_DB_PATH: &str = "INVOICE_DESK_DB_PATH";
pub const ENV_NOTIFICATION_TTL: &str = "INVOICE_DESK_NOTIFICATION_TTL_SECS";
pub const ENV_INVOICE_PREFIX: &str = "INVOICE_DESK_INVOICE_PREFIX";
pub const ENV_PAYMENT_TERMS: &str = "INVOICE_DESK_PAYMENT_TERMS_DAYS";
pub const ENV_CURRENCY: &str = "INVOICE_DESK_CURRENCY";
pub const ENV_LOG: &str = "INVOICE_DESK_LOG";

/// Upper bound for `payment_terms_days` (ten years).
pub const MAX_PAYMENT_TERMS_DAYS: i64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// File name inside the app data directory.
    pub db_file_name: String,
    /// Absolute override; wins over `db_file_name` when set.
    pub db_path: Option<PathBuf>,
    pub notification_ttl_secs: u64,
    pub invoice_prefix: String,
    pub payment_terms_days: i64,
    /// Currency for new profiles that arrive without one.
    pub default_currency: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_file_name: "invoice_desk.db".to_string(),
            db_path: None,
            notification_ttl_secs: 4,
            invoice_prefix: "INV".to_string(),
            payment_terms_days: 15,
            default_currency: "₹".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get(ENV_DB_FILE) {
            config.db_file_name = v;
        }
        if let Some(v) = get(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_NOTIFICATION_TTL) {
            config.notification_ttl_secs = parse_value(ENV_NOTIFICATION_TTL, &v)?;
        }
        if let Some(v) = get(ENV_INVOICE_PREFIX) {
            config.invoice_prefix = v;
        }
        if let Some(v) = get(ENV_PAYMENT_TERMS) {
            config.payment_terms_days = parse_value(ENV_PAYMENT_TERMS, &v)?;
        }
        if let Some(v) = get(ENV_CURRENCY) {
            config.default_currency = v;
        }
        if let Some(v) = get(ENV_LOG) {
            config.log_filter = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.payment_terms_days < 0 {
            return Err(AppError::Config(
                "payment terms cannot be negative".to_string(),
            ));
        }
        if self.payment_terms_days > MAX_PAYMENT_TERMS_DAYS {
            return Err(AppError::Config(format!(
                "payment terms cannot exceed {MAX_PAYMENT_TERMS_DAYS} days, got {}",
                self.payment_terms_days
            )));
        }
        if self.notification_ttl_secs == 0 {
            return Err(AppError::Config(
                "notification lifetime must be at least one second".to_string(),
            ));
        }
        if self.invoice_prefix.is_empty() {
            return Err(AppError::Config("invoice prefix is empty".to_string()));
        }
        Ok(())
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    pub fn resolve_db_path(&self, app_dir: &Path) -> PathBuf {
        match &self.db_path {
            Some(path) => path.clone(),
            None => app_dir.join(&self.db_file_name),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| AppError::Config(format!("{key}: cannot parse {raw:?}")))
}
