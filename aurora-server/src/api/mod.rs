//! API routes
//!
//! - [`health`] - liveness and database probe
//! - [`tenants`] - tenants, check-out, status sync, dashboard
//! - [`maintenance`] - maintenance requests and their workflow
//! - [`inventory`] - apartment inventory, maintenance schedule, bulk update

pub mod extract;

pub mod health;
pub mod inventory;
pub mod maintenance;
pub mod tenants;

pub use extract::{AppJson, AppQuery};
