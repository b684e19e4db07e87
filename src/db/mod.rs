//! Database layer.
//!
//! This module provides:
//! - Database-specific connection pools and the named pool registry
//! - Dispatch macros for backend-specific code

#[macro_use]
pub mod macros;
pub mod pool;

pub use pool::{DbPool, PoolManager};
