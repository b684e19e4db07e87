//! The complete build step.
//!
//! [`BuildProcessor::run`] checks whether the binder is configured at all, validates the
//! configuration, synthesizes and renders the component, hands it to the loader and
//! returns the [`Initialized`] marker when at least one producer exists.

use crate::error::BinderResult;
use crate::models::BindingsConfig;
use crate::synth::codegen::{CodeGenerator, CodegenOptions};
use crate::synth::component::GeneratedComponent;
use crate::synth::engine::{ComponentOptions, Synthesizer};
use crate::synth::gate::Initialized;
use crate::synth::loader::{ComponentLoader, UnremovableRegistry};
use crate::synth::validate::{ValidationWarning, validate};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Source of the pool names known at build time.
pub trait PoolRegistry {
    fn known_pool_names(&self) -> BTreeSet<String>;
}

/// A fixed set of known pool names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownPools(BTreeSet<String>);

impl KnownPools {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownPools {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl PoolRegistry for KnownPools {
    fn known_pool_names(&self) -> BTreeSet<String> {
        self.0.clone()
    }
}

/// What a build step produced.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// `None` when the binder is not configured at all.
    pub component: Option<GeneratedComponent>,
    pub warnings: Vec<ValidationWarning>,
    pub initialized: Option<Initialized>,
}

impl BuildOutcome {
    pub fn producer_count(&self) -> usize {
        self.component.as_ref().map_or(0, |c| c.producers.len())
    }
}

/// Runs validation, synthesis, rendering and loading.
#[derive(Debug, Clone, Default)]
pub struct BuildProcessor {
    synthesizer: Synthesizer,
    generator: CodeGenerator,
}

impl BuildProcessor {
    pub fn new(component: ComponentOptions, codegen: CodegenOptions) -> Self {
        Self {
            synthesizer: Synthesizer::new(component),
            generator: CodeGenerator::new(codegen),
        }
    }

    /// Run the build step.
    ///
    /// Configuration problems only produce warnings; identifier collisions, rendering
    /// and loader failures abort the step.
    pub fn run(
        &self,
        config: &BindingsConfig,
        pools: &dyn PoolRegistry,
        loader: &mut dyn ComponentLoader,
        unremovable: &mut dyn UnremovableRegistry,
    ) -> BinderResult<BuildOutcome> {
        if config.is_unconfigured() {
            debug!("No bindings configured");
            return Ok(BuildOutcome::default());
        }

        let known_pools = pools.known_pool_names();
        let report = validate(config, &known_pools);
        let component = self.synthesizer.synthesize(&report.bindings, &known_pools)?;
        let source = self.generator.render(&component)?;

        unremovable.retain(&component.qualified_name);
        for key in &component.customization_keys {
            unremovable.retain(key);
        }
        loader.write(&component.qualified_name, source.into_bytes())?;

        let initialized = Initialized::for_component(&component);
        info!(
            component = %component.qualified_name,
            producers = component.producers.len(),
            warnings = report.warnings.len(),
            initialized = initialized.is_some(),
            "Binding synthesis complete"
        );

        Ok(BuildOutcome {
            component: Some(component),
            warnings: report.warnings,
            initialized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BindingConfig;
    use crate::synth::loader::{MemoryComponentLoader, UnremovableSet};

    #[test]
    fn test_inactive_configuration_generates_nothing() {
        let mut loader = MemoryComponentLoader::new();
        let mut unremovable = UnremovableSet::new();
        let outcome = BuildProcessor::default()
            .run(
                &BindingsConfig::default(),
                &KnownPools::new(),
                &mut loader,
                &mut unremovable,
            )
            .unwrap();

        assert!(outcome.component.is_none());
        assert!(outcome.initialized.is_none());
        assert!(loader.artifacts.is_empty());
        assert!(unremovable.names().is_empty());
    }

    #[test]
    fn test_active_without_producers_has_no_marker() {
        let config = BindingsConfig::default().named("dsl2", BindingConfig::with_dialect("mysql"));
        let mut loader = MemoryComponentLoader::new();
        let mut unremovable = UnremovableSet::new();
        let outcome = BuildProcessor::default()
            .run(&config, &KnownPools::new(), &mut loader, &mut unremovable)
            .unwrap();

        assert_eq!(outcome.producer_count(), 0);
        assert!(outcome.initialized.is_none());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(loader.artifacts.len(), 1);
    }

    #[test]
    fn test_customization_keys_are_retained() {
        let config = BindingsConfig {
            default_config: BindingConfig::with_dialect("h2").customization_class("app.Custom"),
            ..BindingsConfig::default()
        };
        let mut loader = MemoryComponentLoader::new();
        let mut unremovable = UnremovableSet::new();
        let pools: KnownPools = ["<default>"].into_iter().collect();
        let outcome = BuildProcessor::default()
            .run(&config, &pools, &mut loader, &mut unremovable)
            .unwrap();

        assert!(outcome.initialized.is_some());
        assert!(unremovable.contains("generated::ContextProducer"));
        assert!(unremovable.contains("app.Custom"));
    }
}
