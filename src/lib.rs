//! Finds logging-library call sites in cloned Python repositories.
//!
//! The scanning library lives in `logcall-core` and is re-exported here;
//! this crate adds the repository list handling and interrupt support used
//! by the `logger_finder` and `scan_path` binaries.

pub mod interrupt;
pub mod repo_list;

pub use logcall_core::*;
