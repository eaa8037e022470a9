use serde::{Deserialize, Serialize};

/// Liveness payload returned by `GET /health`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn running() -> Self {
        Self {
            status: "running".to_string(),
        }
    }
}
