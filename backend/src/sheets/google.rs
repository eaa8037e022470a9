//! Google Sheets v4 implementation of [`SheetsApi`].

use super::credentials::ServiceAccount;
use super::{SheetsApi, SheetsConnector};
use crate::config::SHEETS_SCOPE;
use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets/";
/// Query of `values.append`; rows go after the table with the API's default insert mode.
const APPEND_QUERY: [(&str, &str); 1] = [("valueInputOption", "USER_ENTERED")];

/// Builds [`GoogleSheetsClient`]s that share one HTTP connection pool.
pub struct GoogleConnector {
    http: reqwest::Client,
}

impl GoogleConnector {
    /// Every request made through this connector, token exchange included,
    /// is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build http client: {}", e)))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SheetsConnector for GoogleConnector {
    async fn connect(&self, account: &ServiceAccount) -> Result<Box<dyn SheetsApi>, AppError> {
        Ok(Box::new(GoogleSheetsClient {
            http: self.http.clone(),
            account: account.clone(),
            access_token: OnceCell::new(),
        }))
    }
}

/// Authenticates on its first remote call, so a rejected key is reported by
/// the operation that needed it.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    account: ServiceAccount,
    access_token: OnceCell<String>,
}

impl GoogleSheetsClient {
    async fn access_token(&self) -> Result<&str, AppError> {
        let token = self
            .access_token
            .get_or_try_init(|| async {
                let token = self.account.fetch_access_token(&self.http, SHEETS_SCOPE).await?;
                log::debug!(
                    "Obtained access token for {} (expires in {}s)",
                    self.account.client_email,
                    token.expires_in
                );
                Ok::<_, AppError>(token.access_token)
            })
            .await?;
        Ok(token.as_str())
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct AppendBody {
    values: Vec<Vec<Value>>,
}

/// `…/spreadsheets/{id}/values/{range}{suffix}` with every segment percent-encoded.
fn values_url(spreadsheet_id: &str, range: &str, suffix: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(SHEETS_ENDPOINT)
        .map_err(|e| AppError::Configuration(format!("Invalid sheets endpoint: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Configuration("Sheets endpoint cannot be a base".to_string()))?
        .pop_if_empty()
        .push(spreadsheet_id)
        .push("values")
        .push(&format!("{}{}", range, suffix));
    Ok(url)
}

async fn check_status(response: reqwest::Response, action: &str) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::RemoteService(format!(
        "{} returned {}: {}",
        action, status, body
    )))
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>, AppError> {
        let url = values_url(spreadsheet_id, range, "")?;
        let token = self.access_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response, "values.get").await?;
        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }

    async fn append_row(&self, spreadsheet_id: &str, range: &str, row: Vec<Value>) -> Result<(), AppError> {
        let url = values_url(spreadsheet_id, range, ":append")?;
        let token = self.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&APPEND_QUERY)
            .json(&AppendBody { values: vec![row] })
            .send()
            .await?;
        check_status(response, "values.append").await?;
        Ok(())
    }
}
