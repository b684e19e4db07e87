//! Build-time synthesis of query-context producers.
//!
//! This module turns a [`BindingsConfig`](crate::models::BindingsConfig) into generated code:
//! - `ident`: collision-free identifiers derived from binding names
//! - `validate`: non-fatal validation of bindings against known pools
//! - `component`: the synthesized fields and producers
//! - `engine`: builds the component from validated bindings
//! - `codegen`: renders the component into Rust source
//! - `loader`: output collaborators (component loader, unremovable registry)
//! - `processor`: the complete build step
//! - `gate`: the initialized marker handed to runtime initialization

pub mod codegen;
pub mod component;
pub mod engine;
pub mod gate;
pub mod ident;
pub mod loader;
pub mod processor;
pub mod validate;

pub use codegen::{CodeGenerator, CodegenOptions, DEFAULT_CRATE_PATH, GENERATED_HEADER};
pub use component::{
    FieldType, GeneratedComponent, ProducerScope, ProducerShape, Qualifier, SynthesizedField,
    SynthesizedProducer,
};
pub use engine::{ComponentOptions, Synthesizer};
pub use gate::{Initialized, on_container_created};
pub use ident::{FieldKind, IdentifierAllocator, stable_hash};
pub use loader::{
    ComponentLoader, FsComponentLoader, GeneratedArtifact, MemoryComponentLoader,
    UnremovableRegistry, UnremovableSet,
};
pub use processor::{BuildOutcome, BuildProcessor, KnownPools, PoolRegistry};
pub use validate::{ValidatedBinding, ValidationReport, ValidationWarning, validate};
