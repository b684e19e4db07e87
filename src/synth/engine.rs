//! Synthesis engine.
//!
//! Walks validated bindings and builds a [`GeneratedComponent`]: one pool field and one
//! producer per binding, plus one customization field per distinct injected name.

use crate::error::BinderResult;
use crate::models::{BindingName, CustomizationRef, PoolRef, is_default_pool};
use crate::synth::component::{
    FieldType, GeneratedComponent, ProducerScope, ProducerShape, Qualifier, SynthesizedField,
    SynthesizedProducer,
};
use crate::synth::ident::{FieldKind, IdentifierAllocator};
use crate::synth::validate::ValidatedBinding;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Default type name of the generated component.
pub const DEFAULT_COMPONENT_TYPE: &str = "ContextProducer";
/// Default module path the generated component is loaded under.
pub const DEFAULT_COMPONENT_MODULE: &str = "generated";

/// Naming options for the generated component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOptions {
    pub module_path: String,
    pub type_name: String,
}

impl ComponentOptions {
    pub fn qualified_name(&self) -> String {
        if self.module_path.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}::{}", self.module_path, self.type_name)
        }
    }
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            module_path: DEFAULT_COMPONENT_MODULE.to_string(),
            type_name: DEFAULT_COMPONENT_TYPE.to_string(),
        }
    }
}

/// Builds generated components from validated bindings.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: ComponentOptions,
}

impl Synthesizer {
    pub fn new(options: ComponentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComponentOptions {
        &self.options
    }

    /// Synthesize the component for the given bindings.
    ///
    /// Only an identifier collision can fail this pass.
    pub fn synthesize(
        &self,
        bindings: &[ValidatedBinding],
        known_pools: &BTreeSet<String>,
    ) -> BinderResult<GeneratedComponent> {
        let mut allocator = IdentifierAllocator::new();
        let mut component =
            GeneratedComponent::new(self.options.qualified_name(), &self.options.type_name);

        for binding in bindings {
            let producer = self.synthesize_binding(&mut allocator, &mut component, binding)?;
            if let Some(pool) = binding.pool.injection_name() {
                if !is_default_pool(pool) && !known_pools.contains(pool) {
                    debug!(
                        binding = %binding.name,
                        pool = %pool,
                        "Pool is not known at build time, resolving at runtime"
                    );
                }
            }
            debug!(
                binding = %binding.name,
                method = %producer.method_name,
                scope = ?producer.scope,
                "Synthesized producer"
            );
            component.producers.push(producer);
        }

        info!(
            component = %component.qualified_name,
            producers = component.producers.len(),
            fields = component.fields.len(),
            "Synthesized context producer component"
        );
        Ok(component)
    }

    fn synthesize_binding(
        &self,
        allocator: &mut IdentifierAllocator,
        component: &mut GeneratedComponent,
        binding: &ValidatedBinding,
    ) -> BinderResult<SynthesizedProducer> {
        let (pool_field, method, scope, qualifiers) = match &binding.name {
            BindingName::Default => (
                allocator.allocate_default(FieldKind::Pool)?,
                allocator.allocate_default(FieldKind::Producer)?,
                ProducerScope::Singleton,
                vec![Qualifier::Default],
            ),
            BindingName::Named(name) => (
                allocator.allocate(FieldKind::Pool, name)?,
                allocator.allocate(FieldKind::Producer, name)?,
                ProducerScope::PerConsumer,
                vec![
                    Qualifier::Named(name.clone()),
                    Qualifier::Binding(name.clone()),
                ],
            ),
        };

        component.fields.push(SynthesizedField {
            owner_type: component.type_name.clone(),
            field_name: pool_field.identifier.clone(),
            field_type: FieldType::PoolHandle,
            injection_name: match &binding.pool {
                PoolRef::Default => None,
                PoolRef::Named(pool) => Some(pool.clone()),
            },
        });

        let body = match &binding.customization {
            CustomizationRef::Injected(name) => {
                let field = allocator.allocate(FieldKind::Customization, name)?;
                if field.fresh {
                    component.fields.push(SynthesizedField {
                        owner_type: component.type_name.clone(),
                        field_name: field.identifier.clone(),
                        field_type: FieldType::CustomizationHook,
                        injection_name: Some(name.clone()),
                    });
                }
                ProducerShape::InjectedCustomization {
                    field: field.identifier,
                    name: name.clone(),
                }
            }
            CustomizationRef::ClassName(key) => {
                component.customization_keys.insert(key.clone());
                ProducerShape::CustomizationClass { key: key.clone() }
            }
            CustomizationRef::None => ProducerShape::NoCustomization,
        };

        Ok(SynthesizedProducer {
            method_name: method.identifier,
            binding_name: binding.name.clone(),
            dialect: binding.dialect.clone(),
            pool_field: pool_field.identifier,
            scope,
            primary: binding.name.is_default(),
            qualifiers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(name: BindingName, pool: PoolRef, customization: CustomizationRef) -> ValidatedBinding {
        ValidatedBinding {
            name,
            dialect: "postgres".to_string(),
            pool,
            customization,
        }
    }

    fn known() -> BTreeSet<String> {
        ["<default>", "ds1"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_binding_shape() {
        let component = Synthesizer::default()
            .synthesize(
                &[binding(BindingName::Default, PoolRef::Default, CustomizationRef::None)],
                &known(),
            )
            .unwrap();

        assert!(component.unremovable);
        assert_eq!(component.qualified_name, "generated::ContextProducer");
        let producer = &component.producers[0];
        assert_eq!(producer.method_name, "produce_default");
        assert_eq!(producer.scope, ProducerScope::Singleton);
        assert!(producer.primary);
        assert_eq!(producer.qualifiers, vec![Qualifier::Default]);
        assert_eq!(producer.body, ProducerShape::NoCustomization);

        let field = component.field("pool_default").unwrap();
        assert_eq!(field.field_type, FieldType::PoolHandle);
        assert_eq!(field.injection_name, None);
        assert_eq!(field.owner_type, "ContextProducer");
    }

    #[test]
    fn test_named_binding_has_two_qualifiers() {
        let component = Synthesizer::default()
            .synthesize(
                &[binding(
                    BindingName::named("dsl1"),
                    PoolRef::Named("ds1".to_string()),
                    CustomizationRef::None,
                )],
                &known(),
            )
            .unwrap();

        let producer = component.producer(&BindingName::named("dsl1")).unwrap();
        assert_eq!(producer.scope, ProducerScope::PerConsumer);
        assert!(!producer.primary);
        assert_eq!(
            producer.qualifiers,
            vec![
                Qualifier::Named("dsl1".to_string()),
                Qualifier::Binding("dsl1".to_string())
            ]
        );
        let field = component.field(&producer.pool_field).unwrap();
        assert_eq!(field.injection_name.as_deref(), Some("ds1"));
    }

    #[test]
    fn test_shared_injected_customization_gets_one_field() {
        let injected = CustomizationRef::Injected("shared".to_string());
        let component = Synthesizer::default()
            .synthesize(
                &[
                    binding(BindingName::named("a"), PoolRef::Named("ds1".into()), injected.clone()),
                    binding(BindingName::named("b"), PoolRef::Named("ds1".into()), injected),
                ],
                &known(),
            )
            .unwrap();

        let hooks: Vec<_> = component
            .fields
            .iter()
            .filter(|f| f.field_type == FieldType::CustomizationHook)
            .collect();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].injection_name.as_deref(), Some("shared"));
        assert_eq!(component.fields.len(), 3);
    }

    #[test]
    fn test_class_customization_is_recorded() {
        let component = Synthesizer::default()
            .synthesize(
                &[binding(
                    BindingName::Default,
                    PoolRef::Default,
                    CustomizationRef::ClassName("app.Custom".to_string()),
                )],
                &known(),
            )
            .unwrap();
        assert!(component.customization_keys.contains("app.Custom"));
        assert_eq!(
            component.producers[0].body,
            ProducerShape::CustomizationClass {
                key: "app.Custom".to_string()
            }
        );
    }

    #[test]
    fn test_custom_component_name() {
        let synthesizer = Synthesizer::new(ComponentOptions {
            module_path: "app::db".to_string(),
            type_name: "Bindings".to_string(),
        });
        let component = synthesizer.synthesize(&[], &known()).unwrap();
        assert_eq!(component.qualified_name, "app::db::Bindings");
        assert!(!component.has_producers());
    }
}
