//! Overtime Engine for access-control badge events
//!
//! This crate reconciles employees' badge entry/exit events against the
//! extra-hours schedule windows configured on an access-control device,
//! producing a weekly per-employee overtime report and a narrative log of
//! every matching decision.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod report;
pub mod service;
