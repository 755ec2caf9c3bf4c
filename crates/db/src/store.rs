//! PostgreSQL-backed [`EmployeeStore`].

use async_trait::async_trait;
use facegate_core::employee::{EmployeeRecord, EmployeeStore, EmployeeStoreError};
use facegate_core::types::EmployeeId;

use crate::repositories::EmployeeRepo;
use crate::DbPool;

/// Employee lookups against the `employees` table.
#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: DbPool,
}

impl PgEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<EmployeeRecord>, EmployeeStoreError> {
        let id = EmployeeId::parse(id)?;

        let row = EmployeeRepo::find_by_id(&self.pool, &id)
            .await
            .map_err(|e| EmployeeStoreError::Query(e.to_string()))?;

        tracing::debug!(employee_id = %id, found = row.is_some(), "Employee lookup");

        Ok(row.map(EmployeeRecord::from))
    }

    async fn health_check(&self) -> Result<(), EmployeeStoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| EmployeeStoreError::Query(e.to_string()))
    }
}
