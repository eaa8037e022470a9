//! Stub spreadsheet backend and state builders for handler tests.

use crate::config::Config;
use crate::services::{counts, health, index, items, json_config};
use crate::error::AppError;
use crate::sheets::credentials::ServiceAccount;
use crate::sheets::{SheetsApi, SheetsConnector};
use crate::state::AppState;
use actix_web::web;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Same registration as `main.rs`, for `App::configure` in handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::configure_routes())
        .service(items::configure_routes())
        .service(counts::configure_routes())
        .service(index::configure_routes());
}

/// Minimal key document accepted by `ServiceAccount`; never signed by the stub.
pub const STUB_ACCOUNT: &str = r#"{"client_email":"stub@example.com","private_key":"unused"}"#;

#[derive(Debug, Clone, PartialEq)]
pub struct AppendCall {
    pub spreadsheet_id: String,
    pub range: String,
    pub row: Vec<Value>,
}

/// Records every call; reads and appends succeed unless told otherwise.
#[derive(Clone, Default)]
pub struct StubConnector {
    pub rows: Vec<Vec<Value>>,
    pub fail_read: bool,
    pub fail_append: bool,
    pub connects: Arc<Mutex<usize>>,
    pub reads: Arc<Mutex<Vec<String>>>,
    pub appends: Arc<Mutex<Vec<AppendCall>>>,
}

impl StubConnector {
    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap()
    }

    pub fn appended(&self) -> Vec<AppendCall> {
        self.appends.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetsConnector for StubConnector {
    async fn connect(&self, _account: &ServiceAccount) -> Result<Box<dyn SheetsApi>, AppError> {
        *self.connects.lock().unwrap() += 1;
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl SheetsApi for StubConnector {
    async fn read_range(&self, _spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>, AppError> {
        self.reads.lock().unwrap().push(range.to_string());
        if self.fail_read {
            return Err(AppError::RemoteService("stub read failure".to_string()));
        }
        Ok(self.rows.clone())
    }

    async fn append_row(&self, spreadsheet_id: &str, range: &str, row: Vec<Value>) -> Result<(), AppError> {
        if self.fail_append {
            return Err(AppError::RemoteService("quota exceeded".to_string()));
        }
        self.appends.lock().unwrap().push(AppendCall {
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            row,
        });
        Ok(())
    }
}

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// State built from `env` pairs, with the date pinned to 2024-01-15.
pub fn test_state(env: &[(&str, &str)], connector: StubConnector) -> AppState {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();
    let mut state = AppState::new(config, Arc::new(connector));
    state.today = fixed_date;
    state
}

/// Environment of a fully configured deployment without a PIN.
pub fn configured_env() -> Vec<(&'static str, &'static str)> {
    vec![("SHEET_ID", "sheet-123"), ("SERVICE_ACCOUNT_JSON", STUB_ACCOUNT)]
}
