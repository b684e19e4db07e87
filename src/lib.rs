//! DB Context Binder Library
//!
//! Turns named database binding descriptors into query-context producers. At build time
//! the `synth` module validates the bindings and generates a producer component; at
//! runtime the `context` module creates the contexts and serves qualified lookups.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod models;
pub mod synth;

pub use config::Config;
pub use context::{ContextContainer, QueryContext, create_context};
pub use error::{BinderError, BinderResult};
pub use synth::BuildProcessor;
