//! Crate compiled against its own generated members.

pub mod catalog;
pub mod clock;
pub mod gauge;
pub mod settings;
pub mod telemetry;
