//! Producer registration and qualified lookups.
//!
//! A [`ProducerComponent`] registers its producers in a [`BindingTable`] once; the
//! [`ContextContainer`] built from the table answers lookups by [`Qualifier`]. Singleton
//! producers run at most once per container, per-consumer producers run on every lookup.

use crate::context::customize::CustomizationHook;
use crate::context::registry::CustomizationRegistry;
use crate::context::{Customization, QueryContext, create_context_with};
use crate::db::{DbPool, PoolManager};
use crate::error::{BinderError, BinderResult};
use crate::models::{DEFAULT_POOL_NAME, is_default_pool};
use crate::synth::component::{
    FieldType, GeneratedComponent, ProducerScope, ProducerShape, Qualifier, SynthesizedProducer,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

type ProduceFn = Box<dyn Fn() -> BinderResult<QueryContext> + Send + Sync>;

/// A component that contributes producers to a binding table.
pub trait ProducerComponent: Send + Sync {
    fn register(self: Arc<Self>, table: &mut BindingTable);
}

struct ProducerSlot {
    scope: ProducerScope,
    produce: ProduceFn,
    instance: OnceCell<QueryContext>,
}

impl ProducerSlot {
    async fn get(&self) -> BinderResult<QueryContext> {
        match self.scope {
            ProducerScope::Singleton => self
                .instance
                .get_or_try_init(|| async { (self.produce)() })
                .await
                .cloned(),
            ProducerScope::PerConsumer => (self.produce)(),
        }
    }
}

/// Producers keyed by qualifier.
#[derive(Default)]
pub struct BindingTable {
    slots: Vec<Arc<ProducerSlot>>,
    index: BTreeMap<Qualifier, Arc<ProducerSlot>>,
}

impl fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("producers", &self.slots.len())
            .field("qualifiers", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one producer under every given qualifier.
    ///
    /// A qualifier that is already taken is rebound to the new producer.
    pub fn register<Q, F>(&mut self, qualifiers: Q, scope: ProducerScope, produce: F)
    where
        Q: IntoIterator<Item = Qualifier>,
        F: Fn() -> BinderResult<QueryContext> + Send + Sync + 'static,
    {
        let slot = Arc::new(ProducerSlot {
            scope,
            produce: Box::new(produce),
            instance: OnceCell::new(),
        });
        for qualifier in qualifiers {
            debug!(qualifier = %qualifier, scope = ?scope, "Registering producer");
            if self.index.insert(qualifier.clone(), Arc::clone(&slot)).is_some() {
                warn!(qualifier = %qualifier, "Producer registered twice, keeping the latest");
            }
        }
        self.slots.push(slot);
    }

    /// Let a component register its producers.
    pub fn install<C: ProducerComponent + 'static>(&mut self, component: Arc<C>) {
        component.register(self);
    }

    /// Builder form of [`install`](Self::install).
    pub fn with_component<C: ProducerComponent + 'static>(mut self, component: Arc<C>) -> Self {
        self.install(component);
        self
    }
}

/// Read-only view over a populated binding table.
#[derive(Debug)]
pub struct ContextContainer {
    table: BindingTable,
}

impl ContextContainer {
    pub fn new(table: BindingTable) -> Self {
        Self { table }
    }

    /// Resolve a qualifier to a context.
    pub async fn resolve(&self, qualifier: &Qualifier) -> BinderResult<QueryContext> {
        let slot = self
            .table
            .index
            .get(qualifier)
            .ok_or_else(|| BinderError::producer_not_found(qualifier.to_string()))?;
        slot.get().await
    }

    /// The unqualified (default) context.
    pub async fn default_context(&self) -> BinderResult<QueryContext> {
        self.resolve(&Qualifier::Default).await
    }

    /// Generic by-name lookup.
    pub async fn named(&self, name: &str) -> BinderResult<QueryContext> {
        self.resolve(&Qualifier::Named(name.to_string())).await
    }

    /// Binding-specific lookup.
    pub async fn binding(&self, name: &str) -> BinderResult<QueryContext> {
        self.resolve(&Qualifier::Binding(name.to_string())).await
    }

    pub fn contains(&self, qualifier: &Qualifier) -> bool {
        self.table.index.contains_key(qualifier)
    }

    /// Names registered for by-name lookup.
    pub fn names(&self) -> BTreeSet<String> {
        self.table
            .index
            .keys()
            .filter_map(|qualifier| match qualifier {
                Qualifier::Named(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of registered producers.
    pub fn len(&self) -> usize {
        self.table.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.slots.is_empty()
    }
}

/// Supplies pools and named customizations to components.
#[derive(Debug, Clone)]
pub struct Injector {
    pools: HashMap<String, DbPool>,
    registry: Arc<CustomizationRegistry>,
}

impl Injector {
    /// Injector over `pools`, resolving customizations through the process-wide registry.
    pub fn new(pools: HashMap<String, DbPool>) -> Self {
        Self::with_registry(pools, CustomizationRegistry::global())
    }

    pub fn with_registry(
        pools: HashMap<String, DbPool>,
        registry: Arc<CustomizationRegistry>,
    ) -> Self {
        Self { pools, registry }
    }

    /// Injector over every pool currently registered in `manager`.
    pub async fn from_manager(manager: &PoolManager) -> Self {
        Self::new(manager.snapshot().await)
    }

    pub fn default_pool(&self) -> Option<DbPool> {
        self.pools.get(DEFAULT_POOL_NAME).cloned()
    }

    pub fn named_pool(&self, name: &str) -> Option<DbPool> {
        if is_default_pool(name) {
            return self.default_pool();
        }
        self.pools.get(name).cloned()
    }

    /// The customization registered under `name`.
    ///
    /// A failure is kept and reported by every producer that uses the injection.
    pub fn named_customization(&self, name: &str) -> BinderResult<Arc<dyn CustomizationHook>> {
        self.registry.instantiate(name).inspect_err(|e| {
            warn!(name = %name, error = %e, "Named customization unavailable");
        })
    }

    pub fn registry(&self) -> &Arc<CustomizationRegistry> {
        &self.registry
    }
}

/// Installs a [`GeneratedComponent`] at runtime without compiling generated source.
pub struct DeclarativeComponent {
    pools: HashMap<String, Option<DbPool>>,
    hooks: HashMap<String, BinderResult<Arc<dyn CustomizationHook>>>,
    producers: Vec<SynthesizedProducer>,
    registry: Arc<CustomizationRegistry>,
}

impl DeclarativeComponent {
    /// Resolve every field of `component` from the injector.
    pub fn inject(component: &GeneratedComponent, injector: &Injector) -> Self {
        let mut pools = HashMap::new();
        let mut hooks = HashMap::new();
        for field in &component.fields {
            let name = field.injection_name.as_deref();
            match field.field_type {
                FieldType::PoolHandle => {
                    let pool = match name {
                        Some(name) => injector.named_pool(name),
                        None => injector.default_pool(),
                    };
                    pools.insert(field.field_name.clone(), pool);
                }
                FieldType::CustomizationHook => {
                    let hook = match name {
                        Some(name) => injector.named_customization(name),
                        None => Err(BinderError::customization_not_found(&field.field_name)),
                    };
                    hooks.insert(field.field_name.clone(), hook);
                }
            }
        }
        Self {
            pools,
            hooks,
            producers: component.producers.clone(),
            registry: Arc::clone(injector.registry()),
        }
    }

    fn produce(&self, producer: &SynthesizedProducer) -> BinderResult<QueryContext> {
        let pool = self.pools.get(&producer.pool_field).cloned().flatten();
        let customization = match &producer.body {
            ProducerShape::InjectedCustomization { field, name } => {
                let hook = self
                    .hooks
                    .get(field)
                    .cloned()
                    .unwrap_or_else(|| Err(BinderError::customization_not_found(name)));
                Customization::injected(hook)?
            }
            ProducerShape::CustomizationClass { key } => Customization::key(key.as_str()),
            ProducerShape::NoCustomization => Customization::None,
        };
        create_context_with(
            &self.registry,
            Some(&producer.dialect),
            pool,
            customization,
        )
    }
}

impl ProducerComponent for DeclarativeComponent {
    fn register(self: Arc<Self>, table: &mut BindingTable) {
        for (index, producer) in self.producers.iter().enumerate() {
            let this = Arc::clone(&self);
            table.register(producer.qualifiers.clone(), producer.scope, move || {
                this.produce(&this.producers[index])
            });
        }
    }
}
