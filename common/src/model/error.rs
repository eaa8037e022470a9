use serde::{Deserialize, Serialize};

/// Body of every non-2xx JSON response.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ErrorDetail {
    pub detail: String,
}
