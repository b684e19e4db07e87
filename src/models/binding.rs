//! Binding configuration models.
//!
//! A [`BindingsConfig`] holds one unnamed default binding and any number of named
//! bindings. Each binding names a dialect, the pool it runs on and an optional
//! customization hook.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the pool a default binding uses when it does not name one.
pub const DEFAULT_POOL_NAME: &str = "<default>";

/// Check whether a pool name refers to the default pool.
pub fn is_default_pool(name: &str) -> bool {
    name == DEFAULT_POOL_NAME || name.eq_ignore_ascii_case("default")
}

/// Configuration of a single binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// SQL dialect name. Empty or absent means "not configured".
    #[serde(default)]
    pub dialect: Option<String>,
    /// Logical pool name. Only the default binding may omit it.
    #[serde(default, rename = "datasource")]
    pub pool_ref: Option<String>,
    /// Registry key of a customization to construct at runtime.
    #[serde(default, rename = "configuration")]
    pub customization_class: Option<String>,
    /// Name of a pre-built customization instance to inject. Wins over `customization_class`.
    #[serde(default, rename = "configuration_inject")]
    pub customization_injected_name: Option<String>,
}

impl BindingConfig {
    /// Create a binding with only a dialect set.
    pub fn with_dialect(dialect: impl Into<String>) -> Self {
        Self {
            dialect: Some(dialect.into()),
            ..Self::default()
        }
    }

    /// Set the pool reference.
    pub fn pool(mut self, pool: impl Into<String>) -> Self {
        self.pool_ref = Some(pool.into());
        self
    }

    /// Set the customization registry key.
    pub fn customization_class(mut self, key: impl Into<String>) -> Self {
        self.customization_class = Some(key.into());
        self
    }

    /// Set the injected customization name.
    pub fn customization_inject(mut self, name: impl Into<String>) -> Self {
        self.customization_injected_name = Some(name.into());
        self
    }

    /// The dialect, if configured (non-empty).
    pub fn configured_dialect(&self) -> Option<&str> {
        non_empty(self.dialect.as_deref())
    }

    /// True when a dialect is set.
    pub fn is_configured(&self) -> bool {
        self.configured_dialect().is_some()
    }

    /// The pool reference, if set and non-empty.
    pub fn configured_pool(&self) -> Option<&str> {
        non_empty(self.pool_ref.as_deref())
    }

    /// Customization selected for this binding. An injected name wins over a class key.
    pub fn customization(&self) -> CustomizationRef {
        if let Some(name) = non_empty(self.customization_injected_name.as_deref()) {
            CustomizationRef::Injected(name.to_string())
        } else if let Some(key) = non_empty(self.customization_class.as_deref()) {
            CustomizationRef::ClassName(key.to_string())
        } else {
            CustomizationRef::None
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Complete binding configuration: one default entry plus named entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingsConfig {
    /// The default binding, read from the top-level keys.
    #[serde(flatten)]
    pub default_config: BindingConfig,
    /// Named bindings, keyed by binding name.
    #[serde(default, rename = "named")]
    pub named_config: BTreeMap<String, BindingConfig>,
}

impl BindingsConfig {
    /// Add a named binding.
    pub fn named(mut self, name: impl Into<String>, config: BindingConfig) -> Self {
        self.named_config.insert(name.into(), config);
        self
    }

    /// True when nothing is configured: no default dialect and no named entries.
    pub fn is_unconfigured(&self) -> bool {
        !self.default_config.is_configured() && self.named_config.is_empty()
    }

    /// All entries, default first, then named in key order.
    pub fn entries(&self) -> impl Iterator<Item = (BindingName, &BindingConfig)> {
        std::iter::once((BindingName::Default, &self.default_config)).chain(
            self.named_config
                .iter()
                .map(|(name, config)| (BindingName::Named(name.clone()), config)),
        )
    }
}

/// Name of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindingName {
    Default,
    Named(String),
}

impl BindingName {
    /// Create a named binding name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The logical name, `None` for the default binding.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Named(name) => Some(name),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl std::fmt::Display for BindingName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("<default>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Pool a binding is wired to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolRef {
    /// The unqualified default pool.
    Default,
    /// A pool looked up by name.
    Named(String),
}

impl PoolRef {
    /// Name used to look the pool up at injection time, `None` for the default pool.
    pub fn injection_name(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl std::fmt::Display for PoolRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_POOL_NAME),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Customization selected for a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomizationRef {
    /// Inject a registered instance by logical name.
    Injected(String),
    /// Construct from a registry key at runtime.
    ClassName(String),
    None,
}
