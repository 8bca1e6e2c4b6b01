//! Database Models
//!
//! Stored records, API payloads and the read-time views built from them.

pub mod serde_helpers;

pub mod inventory;
pub mod maintenance;
pub mod tenant;

pub use inventory::*;
pub use maintenance::*;
pub use tenant::*;
