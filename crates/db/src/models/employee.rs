//! Employee row model.

use facegate_core::employee::EmployeeRecord;
use sqlx::FromRow;

/// A row from the `employees` table.
///
/// `id` holds the 24-character hex identifier issued by the HR directory.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Reference photo URL. Absent for employees not yet photographed.
    pub image: Option<String>,
}

impl From<Employee> for EmployeeRecord {
    fn from(row: Employee) -> Self {
        EmployeeRecord {
            // CHAR(n) columns are blank-padded.
            id: row.id.trim_end().to_string(),
            name: row.name,
            image_url: row.image,
        }
    }
}
