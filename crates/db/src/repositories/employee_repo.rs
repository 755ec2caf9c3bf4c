//! Repository for the `employees` table.

use facegate_core::types::EmployeeId;
use sqlx::PgPool;

use crate::models::employee::Employee;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, image";

/// Read-only queries over employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Find an employee by id.
    pub async fn find_by_id(pool: &PgPool, id: &EmployeeId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }
}
