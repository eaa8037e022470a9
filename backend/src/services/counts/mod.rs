//! # Count Submission Service
//!
//! Provides `POST /submit_count`, the only write path of the service. A valid
//! submission becomes exactly one row appended to the `Input_Counts` tab.
//!
//! ## Workflow
//!
//! 1.  **Validation**: the JSON extractor rejects bodies that do not match
//!     `CountSubmission` with `422` before the handler runs.
//! 2.  **PIN gate**: when `SHARED_PIN` is configured, the `X-Shared-Pin` header must
//!     match it exactly, otherwise `401 Invalid PIN` and nothing is written.
//! 3.  **Client resolution**: configuration or credential problems answer `500`
//!     with `Config error: ...`.
//! 4.  **Append**: the row `[counter, store, sub-location, date, item, condition, qty]`
//!     is appended to `Input_Counts!A:G` with user-entered semantics. A remote
//!     failure answers `500` with `Sheets append failed: ...`.
//! 5.  **Receipt**: `{"status": "ok", "received": <submission>}`.
//!
//! Failures here are never downgraded the way `/items` does it.

mod submit;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/submit_count";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(submit::process))
}
