//! Description of a synthesized producer component.
//!
//! These values only live for one synthesis pass: the engine builds them, the code
//! generator renders them, and [`DeclarativeComponent`](crate::context::DeclarativeComponent)
//! can install them directly into a binding table.

use crate::models::BindingName;
use std::collections::BTreeSet;

/// Type of a synthesized field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A pool handle (`Option<DbPool>`).
    PoolHandle,
    /// A customization hook (`Option<Arc<dyn CustomizationHook>>`).
    CustomizationHook,
}

/// An injectable field of the generated component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedField {
    pub owner_type: String,
    pub field_name: String,
    pub field_type: FieldType,
    /// Name the value is injected by. `None` only for the default pool.
    pub injection_name: Option<String>,
}

/// Lifetime of a produced context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerScope {
    /// Created at most once per container.
    Singleton,
    /// Created for every lookup.
    PerConsumer,
}

/// Keys a producer is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qualifier {
    /// The primary, unqualified binding.
    Default,
    /// Generic by-name lookup.
    Named(String),
    /// Binding-specific lookup.
    Binding(String),
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("the default binding"),
            Self::Named(name) => write!(f, "name '{}'", name),
            Self::Binding(name) => write!(f, "binding '{}'", name),
        }
    }
}

/// Body of a producer method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerShape {
    /// Read the injected customization field and apply it.
    InjectedCustomization { field: String, name: String },
    /// Pass a registry key, resolved when the context is created.
    CustomizationClass { key: String },
    /// Use the default customization.
    NoCustomization,
}

/// A producer method of the generated component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedProducer {
    pub method_name: String,
    pub binding_name: BindingName,
    /// Dialect literal passed to `create_context`.
    pub dialect: String,
    /// Pool field the producer reads.
    pub pool_field: String,
    pub scope: ProducerScope,
    /// Primary candidate for unqualified lookups.
    pub primary: bool,
    pub qualifiers: Vec<Qualifier>,
    pub body: ProducerShape,
}

/// The generated component: one type holding every field and producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedComponent {
    /// Fully qualified name the component is loaded under.
    pub qualified_name: String,
    /// Rust type name of the generated struct.
    pub type_name: String,
    /// The container must keep it even without static references.
    pub unremovable: bool,
    pub fields: Vec<SynthesizedField>,
    pub producers: Vec<SynthesizedProducer>,
    /// Customization registry keys referenced by producers.
    pub customization_keys: BTreeSet<String>,
}

impl GeneratedComponent {
    /// Create an empty component.
    pub fn new(qualified_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_name: type_name.into(),
            unremovable: true,
            fields: Vec::new(),
            producers: Vec::new(),
            customization_keys: BTreeSet::new(),
        }
    }

    /// Look a field up by name.
    pub fn field(&self, field_name: &str) -> Option<&SynthesizedField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    /// Look a producer up by binding name.
    pub fn producer(&self, binding: &BindingName) -> Option<&SynthesizedProducer> {
        self.producers.iter().find(|p| &p.binding_name == binding)
    }

    /// True when at least one producer was synthesized.
    pub fn has_producers(&self) -> bool {
        !self.producers.is_empty()
    }
}
