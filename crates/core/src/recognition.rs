//! Recognition verdict returned to callers.

use serde::Serialize;

/// Name reported whenever no employee identity can be established.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// Outcome of a recognition request.
///
/// An unknown verdict always pairs `"Unknown"` with a null `employee_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognitionResult {
    pub employee_name: String,
    pub employee_id: Option<String>,
    pub image_url: String,
}

impl RecognitionResult {
    /// Verdict for a request where no employee could be identified.
    pub fn unknown(image_url: impl Into<String>) -> Self {
        Self {
            employee_name: UNKNOWN_EMPLOYEE.to_string(),
            employee_id: None,
            image_url: image_url.into(),
        }
    }

    /// Verdict for a confirmed match.
    pub fn matched(
        employee_name: impl Into<String>,
        employee_id: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            employee_name: employee_name.into(),
            employee_id: Some(employee_id.into()),
            image_url: image_url.into(),
        }
    }
}
