//! Process-wide settings, resolved once at startup.
//!
//! Every value comes from the environment (optionally seeded from a `.env` file)
//! and is frozen into a [`Config`] that handlers receive through the shared
//! application state. Nothing else in the service reads the environment.

use crate::error::AppError;
use crate::sheets::credentials::CredentialSource;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tab receiving one row per submitted count.
pub const TAB_NAME: &str = "Input_Counts";
/// Column B of `Item_Master` from row 2 down holds the official item names.
pub const ITEM_MASTER_RANGE: &str = "Item_Master!B2:B";
/// OAuth scope requested for the service account.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
/// Header carrying the shared PIN on `POST /submit_count`.
pub const SHARED_PIN_HEADER: &str = "X-Shared-Pin";

const DEFAULT_ORIGINS: [&str; 2] = [
    "https://bennu-inventory-counter-production.up.railway.app",
    // Browsers send `Origin: null` for pages opened from file://.
    "null",
];

/// Directory the service is installed in: the one holding the running binary.
///
/// Relative credential paths and the static page are resolved against it, never
/// against the working directory of the process. Under `cargo run`/`cargo test`
/// (which export `CARGO_MANIFEST_DIR`) the binary lives in `target/`, so the
/// crate directory is used instead.
pub fn install_dir(cargo_manifest_dir: Option<String>) -> PathBuf {
    if let Some(dir) = cargo_manifest_dir {
        return PathBuf::from(dir);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub sheet_id: Option<String>,
    pub credentials: Option<CredentialSource>,
    pub shared_pin: Option<String>,
    pub allowed_origins: Vec<String>,
    pub sheets_timeout: Duration,
    pub install_dir: PathBuf,
    pub index_path: PathBuf,
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("Loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset, so `SHARED_PIN=` leaves submissions open and
    /// an empty `SERVICE_ACCOUNT_JSON` falls back to `SERVICE_ACCOUNT_FILE`.
    /// Whitespace is a value: `SHARED_PIN="  "` still gates submissions.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let install_dir = install_dir(lookup("CARGO_MANIFEST_DIR"));

        let credentials = match (get("SERVICE_ACCOUNT_JSON"), get("SERVICE_ACCOUNT_FILE")) {
            (Some(inline), _) => Some(CredentialSource::Inline(inline)),
            (None, Some(file)) => Some(CredentialSource::File(resolve_path(&install_dir, &file))),
            (None, None) => None,
        };

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 8000)?,
            sheet_id: get("SHEET_ID"),
            credentials,
            shared_pin: get("SHARED_PIN"),
            allowed_origins,
            sheets_timeout: Duration::from_secs(parse_or(
                "SHEETS_TIMEOUT_SECS",
                get("SHEETS_TIMEOUT_SECS"),
                30,
            )?),
            index_path: install_dir.join("static").join("index.html"),
            install_dir,
        })
    }

    /// Range the count rows are appended to, all seven columns wide.
    pub fn append_range(&self) -> String {
        format!("{}!A:G", TAB_NAME)
    }
}

fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid {} value '{}': {}", key, value, e))),
        None => Ok(default),
    }
}
