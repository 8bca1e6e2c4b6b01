//! Services
//!
//! - [`lifecycle`] - tenant status synchronization
//! - [`stats`] - dashboard and overview aggregates
//! - [`http`] - router and middleware stack

pub mod http;
pub mod lifecycle;
pub mod stats;

pub use lifecycle::{DerivedValues, SyncFailure, SyncReport, TenantStatusStore, synchronize_all};
