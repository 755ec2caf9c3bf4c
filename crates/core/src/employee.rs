//! Read-only view of the employee directory.
//!
//! Implemented by `facegate_db::store::PgEmployeeStore`.

use async_trait::async_trait;

use crate::error::CoreError;

/// An employee as seen by the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    /// URL of the reference photo, if one is on file.
    pub image_url: Option<String>,
}

impl EmployeeRecord {
    /// The reference photo URL, treating a blank value as missing.
    pub fn reference_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Errors from an employee store lookup.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeStoreError {
    /// The supplied identifier is not in the store's id format.
    #[error("invalid employee id: {0}")]
    InvalidId(#[from] CoreError),

    /// The query itself failed.
    #[error("employee lookup failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Look up an employee by raw identifier. Returns `Ok(None)` when no
    /// employee has that id.
    async fn find_by_id(&self, id: &str) -> Result<Option<EmployeeRecord>, EmployeeStoreError>;

    /// Verify the store is reachable.
    async fn health_check(&self) -> Result<(), EmployeeStoreError>;
}
