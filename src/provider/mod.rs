//! Data providers for employees, access events and schedule windows.
//!
//! A provider hands out a [`ProviderSession`] scoped to one batch run. The
//! session is released by the caller once the batch completes, whether it
//! succeeded or failed.
//!
//! Two providers ship with the engine:
//!
//! - [`DeviceProvider`] talks to the access-control device over HTTP.
//! - [`StaticProvider`] serves an in-memory data set, optionally loaded from
//!   a JSON fixture, for offline runs and tests.

mod device;
mod fixture;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{AccessEvent, Employee, ReportRange, ScheduleWindow};

pub use device::DeviceProvider;
pub use fixture::{Fixture, FixtureEmployee, StaticProvider};

/// Source of sessions against an access-control data store.
#[async_trait]
pub trait AccessProvider: Send + Sync {
    /// Opens a session for one batch run.
    async fn acquire(&self) -> EngineResult<Box<dyn ProviderSession>>;
}

/// A session scoped to one batch run.
///
/// Calls are issued sequentially by the batch runner.
#[async_trait]
pub trait ProviderSession: Send {
    /// Lists every employee, in provider order.
    async fn list_employees(&mut self) -> EngineResult<Vec<Employee>>;

    /// Lists an employee's access events within `range`, in chronological order.
    async fn list_access_events(
        &mut self,
        employee_id: i64,
        range: &ReportRange,
    ) -> EngineResult<Vec<AccessEvent>>;

    /// Lists every schedule window assigned to an employee.
    ///
    /// Windows are returned unfiltered; the reconciler selects the
    /// extra-hours ones.
    async fn list_schedule_windows(&mut self, employee_id: i64)
    -> EngineResult<Vec<ScheduleWindow>>;

    /// Releases the session. Safe to call more than once.
    async fn release(&mut self) -> EngineResult<()>;
}
