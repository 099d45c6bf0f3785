//! HTTP API module for the Overtime Engine.
//!
//! This module serves the artifacts of past runs: the narrative logs and
//! the per-run folders of PDF reports.

mod handlers;
mod response;
mod state;

pub use handlers::create_router;
pub use response::{ApiError, ApiErrorResponse, ReportEntry};
pub use state::AppState;
