//! Item master lookup for the counting form's autocomplete.
//!
//! `GET /items` reads column B of `Item_Master` on every call. Unlike count
//! submission, any failure here (configuration, credentials, remote) is logged
//! and answered with an empty list so the form keeps working as a free-text
//! entry.

mod get;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/items";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(get::process))
}
