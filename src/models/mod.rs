//! Data models for the binder.
//!
//! This module re-exports all model types used throughout the crate.

pub mod binding;
pub mod connection;
pub mod dialect;

// Re-export commonly used types
pub use binding::{
    BindingConfig, BindingName, BindingsConfig, CustomizationRef, DEFAULT_POOL_NAME, PoolRef,
    is_default_pool,
};
pub use connection::DatabaseType;
pub use dialect::{DialectResolution, PROCESS_DEFAULT_DIALECT, SqlDialect};
