//! Guard performance scoring and shift-assignment ranking.
//!
//! The engine under [`workflows::staffing`] is pure: every operation reads caller
//! supplied slices and returns freshly allocated results. Configuration, telemetry,
//! and error plumbing sit alongside it for the HTTP and CLI surfaces.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
