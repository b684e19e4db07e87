//! Rust source generation for a [`GeneratedComponent`].
//!
//! The component is rendered into a struct with one field per injection point, one
//! method per producer and a `ProducerComponent` impl that registers every producer in
//! a binding table. Consumers compile the output normally, typically with
//! `include!(concat!(env!("OUT_DIR"), "/context_producer.rs"))`.

use crate::error::{BinderError, BinderResult};
use crate::models::BindingName;
use crate::synth::component::{
    FieldType, GeneratedComponent, ProducerScope, ProducerShape, Qualifier, SynthesizedField,
    SynthesizedProducer,
};
use proc_macro2::TokenStream;
use quote::quote;

/// Path the generated code uses to reach this crate.
pub const DEFAULT_CRATE_PATH: &str = "::db_context_binder";

/// First lines of every rendered file.
pub const GENERATED_HEADER: &str =
    "// @generated by db-context-binder from the binding configuration. Do not edit.\n\n";

/// Options for source rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    pub crate_path: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            crate_path: DEFAULT_CRATE_PATH.to_string(),
        }
    }
}

/// Renders generated components into formatted Rust source.
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    options: CodegenOptions,
}

impl CodeGenerator {
    pub fn new(options: CodegenOptions) -> Self {
        Self { options }
    }

    /// Render the component into formatted source text.
    pub fn render(&self, component: &GeneratedComponent) -> BinderResult<String> {
        let tokens = self.generate(component)?;
        let file = syn::parse2::<syn::File>(tokens).map_err(|e| {
            BinderError::codegen(
                &component.qualified_name,
                format!("Failed to parse generated code: {}", e),
            )
        })?;
        Ok(format!("{}{}", GENERATED_HEADER, prettyplease::unparse(&file)))
    }

    /// Generate the token stream for the component.
    pub fn generate(&self, component: &GeneratedComponent) -> BinderResult<TokenStream> {
        let krate: syn::Path = syn::parse_str(&self.options.crate_path).map_err(|e| {
            BinderError::codegen(
                &component.qualified_name,
                format!("Invalid crate path '{}': {}", self.options.crate_path, e),
            )
        })?;
        let type_ident = parse_ident(component, &component.type_name)?;

        let fields = component
            .fields
            .iter()
            .map(|field| self.field_decl(component, &krate, field))
            .collect::<BinderResult<Vec<_>>>()?;
        let injections = component
            .fields
            .iter()
            .map(|field| self.field_injection(component, field))
            .collect::<BinderResult<Vec<_>>>()?;
        let methods = component
            .producers
            .iter()
            .map(|producer| self.producer_method(component, &krate, producer))
            .collect::<BinderResult<Vec<_>>>()?;
        let registrations = component
            .producers
            .iter()
            .map(|producer| self.registration(component, &krate, producer))
            .collect::<BinderResult<Vec<_>>>()?;

        let doc = format!(
            " Query-context producers for {} binding(s), generated from the binding configuration.",
            component.producers.len()
        );

        Ok(quote! {
            #[doc = #doc]
            pub struct #type_ident {
                #(#fields,)*
            }

            impl #type_ident {
                /// Resolve every injection point from the injector.
                #[allow(unused_variables)]
                pub fn inject(injector: &#krate::context::Injector) -> Self {
                    Self {
                        #(#injections,)*
                    }
                }

                #(#methods)*
            }

            impl #krate::context::ProducerComponent for #type_ident {
                #[allow(unused_variables)]
                fn register(
                    self: ::std::sync::Arc<Self>,
                    table: &mut #krate::context::BindingTable,
                ) {
                    #(#registrations)*
                }
            }
        })
    }

    fn field_decl(
        &self,
        component: &GeneratedComponent,
        krate: &syn::Path,
        field: &SynthesizedField,
    ) -> BinderResult<TokenStream> {
        let ident = parse_ident(component, &field.field_name)?;
        let ty = match field.field_type {
            FieldType::PoolHandle => quote!(::std::option::Option<#krate::db::DbPool>),
            FieldType::CustomizationHook => quote! {
                #krate::error::BinderResult<::std::sync::Arc<dyn #krate::context::CustomizationHook>>
            },
        };
        Ok(quote!(#ident: #ty))
    }

    fn field_injection(
        &self,
        component: &GeneratedComponent,
        field: &SynthesizedField,
    ) -> BinderResult<TokenStream> {
        let ident = parse_ident(component, &field.field_name)?;
        let value = match (field.field_type, field.injection_name.as_deref()) {
            (FieldType::PoolHandle, None) => quote!(injector.default_pool()),
            (FieldType::PoolHandle, Some(name)) => quote!(injector.named_pool(#name)),
            (FieldType::CustomizationHook, Some(name)) => {
                quote!(injector.named_customization(#name))
            }
            (FieldType::CustomizationHook, None) => {
                return Err(BinderError::codegen(
                    &component.qualified_name,
                    format!("Customization field '{}' has no name", field.field_name),
                ));
            }
        };
        Ok(quote!(#ident: #value))
    }

    fn producer_method(
        &self,
        component: &GeneratedComponent,
        krate: &syn::Path,
        producer: &SynthesizedProducer,
    ) -> BinderResult<TokenStream> {
        let method = parse_ident(component, &producer.method_name)?;
        let pool = parse_ident(component, &producer.pool_field)?;
        let dialect = &producer.dialect;
        let doc = match &producer.binding_name {
            BindingName::Default => " Produces the default query context.".to_string(),
            BindingName::Named(name) => format!(" Produces the query context for binding `{}`.", name),
        };

        let body = match &producer.body {
            ProducerShape::InjectedCustomization { field, .. } => {
                let field = parse_ident(component, field)?;
                quote! {
                    let customization =
                        #krate::context::Customization::injected(self.#field.clone())?;
                    #krate::context::create_context(
                        ::std::option::Option::Some(#dialect),
                        self.#pool.clone(),
                        customization,
                    )
                }
            }
            ProducerShape::CustomizationClass { key } => quote! {
                #krate::context::create_context(
                    ::std::option::Option::Some(#dialect),
                    self.#pool.clone(),
                    #krate::context::Customization::key(#key),
                )
            },
            ProducerShape::NoCustomization => quote! {
                #krate::context::create_context(
                    ::std::option::Option::Some(#dialect),
                    self.#pool.clone(),
                    #krate::context::Customization::None,
                )
            },
        };

        Ok(quote! {
            #[doc = #doc]
            pub fn #method(
                &self,
            ) -> #krate::error::BinderResult<#krate::context::QueryContext> {
                #body
            }
        })
    }

    fn registration(
        &self,
        component: &GeneratedComponent,
        krate: &syn::Path,
        producer: &SynthesizedProducer,
    ) -> BinderResult<TokenStream> {
        let method = parse_ident(component, &producer.method_name)?;
        let scope = match producer.scope {
            ProducerScope::Singleton => quote!(#krate::context::ProducerScope::Singleton),
            ProducerScope::PerConsumer => quote!(#krate::context::ProducerScope::PerConsumer),
        };
        let qualifiers = producer.qualifiers.iter().map(|qualifier| match qualifier {
            Qualifier::Default => quote!(#krate::context::Qualifier::Default),
            Qualifier::Named(name) => {
                quote!(#krate::context::Qualifier::Named(::std::string::String::from(#name)))
            }
            Qualifier::Binding(name) => {
                quote!(#krate::context::Qualifier::Binding(::std::string::String::from(#name)))
            }
        });

        Ok(quote! {
            {
                let this = ::std::sync::Arc::clone(&self);
                table.register(
                    [#(#qualifiers),*],
                    #scope,
                    move || this.#method(),
                );
            }
        })
    }
}

fn parse_ident(component: &GeneratedComponent, name: &str) -> BinderResult<syn::Ident> {
    syn::parse_str::<syn::Ident>(name).map_err(|e| {
        BinderError::codegen(
            &component.qualified_name,
            format!("'{}' is not a valid identifier: {}", name, e),
        )
    })
}
