//! # lima-client
//!
//! Typed wrapper around the `limactl` command-line tool.
//!
//! Lima exposes everything the dashboard needs through its CLI:
//! `limactl list --format json` prints one JSON object per line, and
//! the lifecycle verbs (`start`, `stop`, `delete`) report success via
//! their exit status. This crate shells out to that binary and maps
//! the results onto typed records and errors; it never talks to the
//! hypervisor directly.

pub mod client;
pub mod error;
pub mod vm;

pub use client::LimaClient;
pub use error::{LimaError, Result};
pub use vm::{VmRecord, VmStatus};
