//! Validation pass over the binding configuration.
//!
//! Validation never fails. Unconfigured entries are skipped silently, suspicious ones
//! produce a [`ValidationWarning`] and are still synthesized, and named entries without
//! a pool reference are skipped with a warning.

use crate::models::dialect;
use crate::models::{BindingName, BindingsConfig, CustomizationRef, PoolRef, is_default_pool};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A binding that passed validation and will get a producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBinding {
    pub name: BindingName,
    /// Dialect exactly as configured; resolved at runtime.
    pub dialect: String,
    pub pool: PoolRef,
    pub customization: CustomizationRef,
}

/// Non-fatal configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The default binding uses the default pool, but no default pool is known.
    DefaultPoolNotFound,
    /// A named binding has no pool reference; it is skipped.
    MissingPoolRef { binding: String },
    /// An empty binding name; it is skipped.
    EmptyBindingName,
    /// The referenced pool is not known at build time.
    PoolNotFound { binding: BindingName, pool: String },
    /// The default binding explicitly names a non-default pool.
    NonDefaultPoolForDefault { pool: String },
    /// The dialect is not in the alias table and will fall back at runtime.
    UnknownDialect {
        binding: BindingName,
        dialect: String,
    },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultPoolNotFound => write!(f, "Default pool not found"),
            Self::MissingPoolRef { binding } => write!(
                f,
                "Binding '{}' has no pool reference and is skipped",
                binding
            ),
            Self::EmptyBindingName => write!(f, "Binding with an empty name is skipped"),
            Self::PoolNotFound { binding, pool } => {
                write!(f, "Pool '{}' for binding '{}' not found", pool, binding)
            }
            Self::NonDefaultPoolForDefault { pool } => {
                write!(f, "Default binding uses non-default pool '{}'", pool)
            }
            Self::UnknownDialect { binding, dialect } => write!(
                f,
                "Unknown dialect '{}' for binding '{}', the default dialect will be used",
                dialect, binding
            ),
        }
    }
}

/// Result of the validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Bindings to synthesize: default first, then named in key order.
    pub bindings: Vec<ValidatedBinding>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    fn warn(&mut self, warning: ValidationWarning) {
        warn!(warning = %warning, "Binding configuration warning");
        self.warnings.push(warning);
    }
}

/// Validate the configuration against the set of known pool names.
pub fn validate(config: &BindingsConfig, known_pools: &BTreeSet<String>) -> ValidationReport {
    let mut report = ValidationReport::default();
    let has_default_pool = known_pools.iter().any(|name| is_default_pool(name));

    if !config.default_config.is_configured() {
        debug!("No default dialect configured");
    }

    for (name, binding) in config.entries() {
        let Some(dialect) = binding.configured_dialect() else {
            debug!(binding = %name, "Binding has no dialect, skipping");
            continue;
        };

        let pool = match &name {
            BindingName::Default => match binding.configured_pool() {
                Some(pool) if !is_default_pool(pool) => {
                    report.warn(ValidationWarning::NonDefaultPoolForDefault {
                        pool: pool.to_string(),
                    });
                    if !known_pools.contains(pool) {
                        report.warn(ValidationWarning::PoolNotFound {
                            binding: name.clone(),
                            pool: pool.to_string(),
                        });
                    }
                    PoolRef::Named(pool.to_string())
                }
                _ => {
                    if !has_default_pool {
                        report.warn(ValidationWarning::DefaultPoolNotFound);
                    }
                    PoolRef::Default
                }
            },
            BindingName::Named(binding_name) => {
                if binding_name.trim().is_empty() {
                    report.warn(ValidationWarning::EmptyBindingName);
                    continue;
                }
                let Some(pool) = binding.configured_pool() else {
                    report.warn(ValidationWarning::MissingPoolRef {
                        binding: binding_name.clone(),
                    });
                    continue;
                };
                let known = if is_default_pool(pool) {
                    has_default_pool
                } else {
                    known_pools.contains(pool)
                };
                if !known {
                    report.warn(ValidationWarning::PoolNotFound {
                        binding: name.clone(),
                        pool: pool.to_string(),
                    });
                }
                PoolRef::Named(pool.to_string())
            }
        };

        if !dialect::lookup(dialect).recognized {
            report.warn(ValidationWarning::UnknownDialect {
                binding: name.clone(),
                dialect: dialect.to_string(),
            });
        }

        report.bindings.push(ValidatedBinding {
            name,
            dialect: dialect.to_string(),
            pool,
            customization: binding.customization(),
        });
    }

    report
}
