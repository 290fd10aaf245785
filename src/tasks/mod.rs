//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Retention cleanup: sweeps cached pages and recorded errors past the
//!   retention window

mod cleanup;

pub use cleanup::spawn_cleanup_task;
