//! Shared, read-only application state injected into every handler.

use crate::config::Config;
use crate::sheets::SheetsConnector;
use chrono::NaiveDate;
use std::sync::Arc;

/// Cloned into each actix worker as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Produces authenticated spreadsheet clients; swapped for a stub in tests.
    pub connector: Arc<dyn SheetsConnector>,
    /// Source of the date stamped on submitted rows.
    pub today: fn() -> NaiveDate,
}

impl AppState {
    pub fn new(config: Config, connector: Arc<dyn SheetsConnector>) -> Self {
        Self {
            config: Arc::new(config),
            connector,
            today: local_today,
        }
    }
}

/// Today's calendar date in the server's local timezone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
