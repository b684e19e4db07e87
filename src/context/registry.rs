//! Process-wide registry of customization hooks.
//!
//! Customizations referenced by key in the binding configuration are resolved here. The
//! registry is filled at start-up, installed once, and read-only afterwards. Lookups of
//! unregistered keys fail.

use crate::context::customize::CustomizationHook;
use crate::error::{BinderError, BinderResult, BoxError};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info};

type HookFactory = Box<dyn Fn() -> Result<Arc<dyn CustomizationHook>, BoxError> + Send + Sync>;

static GLOBAL_REGISTRY: OnceLock<Arc<CustomizationRegistry>> = OnceLock::new();

/// Customization hooks by key.
///
/// Instances are shared by every context that references their key; factories build a
/// fresh hook per context.
#[derive(Default)]
pub struct CustomizationRegistry {
    instances: HashMap<String, Arc<dyn CustomizationHook>>,
    factories: HashMap<String, HookFactory>,
}

impl fmt::Debug for CustomizationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomizationRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

impl CustomizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared hook instance.
    pub fn with_instance(
        mut self,
        key: impl Into<String>,
        hook: Arc<dyn CustomizationHook>,
    ) -> Self {
        let key = key.into();
        self.factories.remove(&key);
        self.instances.insert(key, hook);
        self
    }

    /// Register a factory invoked once per created context.
    pub fn with_factory<F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn CustomizationHook>, BoxError> + Send + Sync + 'static,
    {
        let key = key.into();
        self.instances.remove(&key);
        self.factories.insert(key, Box::new(factory));
        self
    }

    /// Register a hook type constructed through `Default`.
    pub fn register_type<T>(self, key: impl Into<String>) -> Self
    where
        T: CustomizationHook + Default + 'static,
    {
        self.with_factory(key, || Ok(Arc::new(T::default()) as Arc<dyn CustomizationHook>))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.instances.contains_key(key) || self.factories.contains_key(key)
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.instances
            .keys()
            .chain(self.factories.keys())
            .map(String::as_str)
            .collect()
    }

    /// The shared instance registered under `key`, if any.
    pub fn instance(&self, key: &str) -> Option<Arc<dyn CustomizationHook>> {
        self.instances.get(key).cloned()
    }

    /// Resolve a key to a hook: shared instance first, then factory.
    pub fn instantiate(&self, key: &str) -> BinderResult<Arc<dyn CustomizationHook>> {
        if let Some(hook) = self.instance(key) {
            return Ok(hook);
        }
        let factory = self
            .factories
            .get(key)
            .ok_or_else(|| BinderError::customization_not_found(key))?;
        factory().map_err(|source| {
            error!(key = %key, error = %source, "Customization factory failed");
            BinderError::customization_failed(key, source)
        })
    }

    /// Install this registry as the process-wide registry.
    ///
    /// Fails when a registry was already installed or the global one was already read.
    pub fn install(self) -> BinderResult<Arc<Self>> {
        let registry = Arc::new(self);
        GLOBAL_REGISTRY
            .set(Arc::clone(&registry))
            .map_err(|_| BinderError::config("Customization registry is already installed"))?;
        info!(keys = ?registry.keys(), "Installed customization registry");
        Ok(registry)
    }

    /// The process-wide registry; empty when none was installed.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| {
            debug!("No customization registry installed, using an empty one");
            Arc::new(Self::new())
        }))
    }
}
