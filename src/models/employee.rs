//! Employee model.
//!
//! This module defines the Employee struct for representing the people
//! whose badge events are reconciled against extra-hours windows.

use serde::{Deserialize, Serialize};

/// Represents an employee registered on the access-control device.
///
/// Employees are immutable for the duration of a batch run.
///
/// # Examples
///
/// ```
/// use overtime_engine::models::Employee;
///
/// let employee = Employee {
///     id: 42,
///     registration: "0042".to_string(),
///     name: "Ana Souza".to_string(),
/// };
/// assert_eq!(employee.file_stem(), "42_Ana_Souza");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    /// Device identifier for the employee.
    pub id: i64,
    /// Registration (payroll) code.
    #[serde(default)]
    pub registration: String,
    /// Display name.
    pub name: String,
}

impl Employee {
    /// Returns the file stem used for this employee's report: `{id}_{Name_With_Underscores}`.
    ///
    /// Spaces, path separators and characters that are not valid in file names
    /// become `_`, so the stem always names a single file.
    pub fn file_stem(&self) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        format!("{}_{}", self.id, name.replace("..", "_"))
    }
}
