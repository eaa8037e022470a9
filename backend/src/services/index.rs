//! Serves the counting form.
//!
//! The page is read from the install directory on every request, so editing
//! `static/index.html` takes effect without a restart. A missing file is a 500.

use crate::error::AppError;
use crate::state::AppState;
use actix_files::NamedFile;
use actix_web::web::{get, scope};
use actix_web::{web, Scope};

/// Registered last: its empty prefix matches every path.
pub fn configure_routes() -> Scope {
    scope("").route("/", get().to(process))
}

async fn process(state: web::Data<AppState>) -> Result<NamedFile, AppError> {
    let file = NamedFile::open_async(&state.config.index_path).await?;
    Ok(file.use_etag(false).use_last_modified(false))
}
