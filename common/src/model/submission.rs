use crate::requests::CountSubmission;
use serde::{Deserialize, Serialize};

/// Response of a successful `POST /submit_count`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SubmitReceipt {
    /// Always `"ok"`.
    pub status: String,
    /// The submission exactly as it was validated.
    pub received: CountSubmission,
}

impl SubmitReceipt {
    pub fn ok(received: CountSubmission) -> Self {
        Self {
            status: "ok".to_string(),
            received,
        }
    }
}
