//! HTTP surface of the inventory counter.
//!
//! Each sub-module owns one area of the API and exposes a `configure_routes`
//! function returning the Actix `Scope` that `main.rs` registers:
//! - `index`: `GET /`, the counting form.
//! - `health`: `GET /health`, liveness with no dependency on configuration.
//! - `items`: `GET /items`, item names for autocomplete (soft-fails to an empty list).
//! - `counts`: `POST /submit_count`, PIN-gated append of one count row.

pub mod counts;
pub mod health;
pub mod index;
pub mod items;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::Config;
use crate::error::AppError;
use actix_cors::Cors;
use actix_web::web;

/// Submissions are a handful of short strings.
const JSON_LIMIT: usize = 64 * 1024;

/// JSON bodies are parsed whatever their `Content-Type`; extraction failures
/// become `422` with the parser message as detail.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .content_type_required(false)
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

/// Cross-origin policy: only the configured origins, with credentials, any
/// method and any header.
pub fn cors(config: &Config) -> Cors {
    let origins = config.allowed_origins.clone();
    Cors::default()
        .allowed_origin_fn(move |origin, _req| {
            origins
                .iter()
                .any(|allowed| origin.as_bytes() == allowed.as_bytes())
        })
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}
