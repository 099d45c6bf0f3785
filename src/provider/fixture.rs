//! In-memory provider backed by a fixture.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AccessProvider, ProviderSession};
use crate::error::{EngineError, EngineResult};
use crate::models::{AccessEvent, Employee, ReportRange, ScheduleWindow};

/// One employee with their events and windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureEmployee {
    /// The employee record.
    #[serde(flatten)]
    pub employee: Employee,
    /// Access events, in the order they are served.
    #[serde(default)]
    pub events: Vec<AccessEvent>,
    /// Schedule windows assigned to the employee.
    #[serde(default)]
    pub windows: Vec<ScheduleWindow>,
}

/// A complete offline data set.
///
/// # Example
///
/// ```
/// use overtime_engine::provider::Fixture;
///
/// let fixture: Fixture = serde_json::from_str(r#"{
///     "employees": [
///         {
///             "id": 1,
///             "registration": "0001",
///             "name": "Ana",
///             "events": [
///                 { "timestamp": "2026-01-12T09:30:00", "direction": "entry" }
///             ],
///             "windows": []
///         }
///     ]
/// }"#).unwrap();
/// assert_eq!(fixture.employees[0].events.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Employees in provider order.
    pub employees: Vec<FixtureEmployee>,
}

/// Provider serving a [`Fixture`] from memory.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    fixture: Arc<Fixture>,
    released: Arc<AtomicUsize>,
}

impl StaticProvider {
    /// Creates a provider over `fixture`.
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Loads a fixture from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let fixture = serde_json::from_str(&content).map_err(|e| EngineError::InvalidData {
            message: format!("fixture '{}': {}", path.display(), e),
        })?;
        Ok(Self::new(fixture))
    }

    /// Number of sessions released so far.
    pub fn sessions_released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessProvider for StaticProvider {
    async fn acquire(&self) -> EngineResult<Box<dyn ProviderSession>> {
        Ok(Box::new(StaticSession {
            fixture: Arc::clone(&self.fixture),
            released: Arc::clone(&self.released),
            open: true,
        }))
    }
}

struct StaticSession {
    fixture: Arc<Fixture>,
    released: Arc<AtomicUsize>,
    open: bool,
}

impl StaticSession {
    fn employee(&self, employee_id: i64) -> EngineResult<&FixtureEmployee> {
        self.fixture
            .employees
            .iter()
            .find(|e| e.employee.id == employee_id)
            .ok_or_else(|| EngineError::InvalidData {
                message: format!("unknown employee {}", employee_id),
            })
    }
}

#[async_trait]
impl ProviderSession for StaticSession {
    async fn list_employees(&mut self) -> EngineResult<Vec<Employee>> {
        Ok(self
            .fixture
            .employees
            .iter()
            .map(|e| e.employee.clone())
            .collect())
    }

    async fn list_access_events(
        &mut self,
        employee_id: i64,
        range: &ReportRange,
    ) -> EngineResult<Vec<AccessEvent>> {
        Ok(self
            .employee(employee_id)?
            .events
            .iter()
            .filter(|e| range.contains(e.timestamp))
            .cloned()
            .collect())
    }

    async fn list_schedule_windows(
        &mut self,
        employee_id: i64,
    ) -> EngineResult<Vec<ScheduleWindow>> {
        Ok(self.employee(employee_id)?.windows.clone())
    }

    async fn release(&mut self) -> EngineResult<()> {
        if self.open {
            self.open = false;
            self.released.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
