//! Access to the remote spreadsheet that stores the item master and the counts.
//!
//! Handlers never talk to the Sheets API directly. They call [`resolve_client`],
//! which checks the configuration, loads the service account and asks a
//! [`SheetsConnector`] for a [`SheetsApi`]. The result is wrapped in a
//! [`Spreadsheet`] bound to the configured spreadsheet id.
//!
//! A new handle is resolved per request and authenticates on its first remote
//! call, so a revoked key fails that read or append on the next request
//! instead of being masked by a cached token.

pub mod credentials;
pub mod google;

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use credentials::ServiceAccount;
use inventory_common::requests::CountSubmission;
use serde_json::Value;

/// The two remote operations the service needs.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Rows of the range in sheet order. An empty range yields no rows.
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>, AppError>;

    /// Appends `row` after the last row of `range`, letting the service coerce
    /// the cells as if a user had typed them.
    async fn append_row(&self, spreadsheet_id: &str, range: &str, row: Vec<Value>) -> Result<(), AppError>;
}

/// Turns a service account into a [`SheetsApi`] that authenticates as it.
#[async_trait]
pub trait SheetsConnector: Send + Sync {
    async fn connect(&self, account: &ServiceAccount) -> Result<Box<dyn SheetsApi>, AppError>;
}

/// Authenticated client bound to one spreadsheet.
pub struct Spreadsheet {
    id: String,
    api: Box<dyn SheetsApi>,
}

impl Spreadsheet {
    pub fn new(id: impl Into<String>, api: Box<dyn SheetsApi>) -> Self {
        Self { id: id.into(), api }
    }

    pub async fn read_range(&self, range: &str) -> Result<Vec<Vec<Value>>, AppError> {
        self.api.read_range(&self.id, range).await
    }

    pub async fn append_row(&self, range: &str, row: Vec<Value>) -> Result<(), AppError> {
        self.api.append_row(&self.id, range, row).await
    }
}

/// Resolves an authenticated spreadsheet handle from the configuration.
///
/// Fails with [`AppError::Configuration`] when `SHEET_ID` is missing, when no
/// credential source is configured, or when the key document cannot be loaded.
pub async fn resolve_client(
    config: &Config,
    connector: &dyn SheetsConnector,
) -> Result<Spreadsheet, AppError> {
    let sheet_id = config
        .sheet_id
        .as_deref()
        .ok_or_else(|| AppError::Configuration("SHEET_ID env var is not set".to_string()))?;

    let source = config.credentials.as_ref().ok_or_else(|| {
        AppError::Configuration("No service account credentials configured.".to_string())
    })?;

    let account = source.load().await?;
    let api = connector.connect(&account).await?;

    Ok(Spreadsheet::new(sheet_id, api))
}

/// First-column values of `rows`, trimmed, with blank cells and empty rows dropped.
pub fn item_names(rows: &[Vec<Value>]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.first())
        .filter_map(|cell| match cell {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// The row appended for one submission, in sheet column order A..G:
/// counter, store, sub-location, date, item, condition, quantity.
pub fn count_row(submission: &CountSubmission, date: NaiveDate) -> Vec<Value> {
    vec![
        Value::from(submission.counter_name.as_str()),
        Value::from(submission.store_name.as_str()),
        Value::from(submission.sub_location.as_str()),
        Value::from(date.format("%Y-%m-%d").to_string()),
        Value::from(submission.item_name.as_str()),
        Value::from(submission.condition.as_str()),
        Value::from(submission.qty),
    ]
}
