//! Identifier types shared across crates.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Employee identifiers use the 12-byte document object-id form,
/// rendered as 24 hexadecimal characters.
const EMPLOYEE_ID_PATTERN: &str = r"^[0-9a-fA-F]{24}$";

static EMPLOYEE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMPLOYEE_ID_PATTERN).expect("valid regex"));

/// A validated employee identifier.
///
/// Stored lowercase so lookups are insensitive to the caller's hex casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Parse a raw identifier supplied by a client.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if EMPLOYEE_ID_RE.is_match(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(CoreError::Validation(format!(
                "'{raw}' is not a valid employee id, must be a 24-character hex string"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
