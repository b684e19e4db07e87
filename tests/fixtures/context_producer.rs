// @generated by db-context-binder from the binding configuration. Do not edit.

/// Query-context producers for 5 binding(s), generated from the binding configuration.
pub struct ContextProducer {
    pool_default: ::std::option::Option<::db_context_binder::db::DbPool>,
    pool_ca24fe2edc05abf15e6261fe4aa24937b75a70fd: ::std::option::Option<
        ::db_context_binder::db::DbPool,
    >,
    pool_5f76b3ec626ebf4e675bd5767dd1671758b70b35: ::std::option::Option<
        ::db_context_binder::db::DbPool,
    >,
    customization_f526795c95399cea27c055c842c3d6ab018ed0fa: ::db_context_binder::error::BinderResult<
        ::std::sync::Arc<dyn ::db_context_binder::context::CustomizationHook>,
    >,
    pool_c6c331958744bb3f00902fd3e507045e2fa152ea: ::std::option::Option<
        ::db_context_binder::db::DbPool,
    >,
    customization_e67d23e7820c49a8051dac2831f38290f5e72f66: ::db_context_binder::error::BinderResult<
        ::std::sync::Arc<dyn ::db_context_binder::context::CustomizationHook>,
    >,
    pool_78da267198b7f49fd64cdfdfaf3e61513a30c5df: ::std::option::Option<
        ::db_context_binder::db::DbPool,
    >,
}
impl ContextProducer {
    /// Resolve every injection point from the injector.
    #[allow(unused_variables)]
    pub fn inject(injector: &::db_context_binder::context::Injector) -> Self {
        Self {
            pool_default: injector.default_pool(),
            pool_ca24fe2edc05abf15e6261fe4aa24937b75a70fd: injector.named_pool("ds1"),
            pool_5f76b3ec626ebf4e675bd5767dd1671758b70b35: injector.named_pool("ds1"),
            customization_f526795c95399cea27c055c842c3d6ab018ed0fa: injector
                .named_customization("broken"),
            pool_c6c331958744bb3f00902fd3e507045e2fa152ea: injector.named_pool("ds1"),
            customization_e67d23e7820c49a8051dac2831f38290f5e72f66: injector
                .named_customization("cfg"),
            pool_78da267198b7f49fd64cdfdfaf3e61513a30c5df: injector.named_pool("ds1"),
        }
    }
    /// Produces the default query context.
    pub fn produce_default(
        &self,
    ) -> ::db_context_binder::error::BinderResult<::db_context_binder::context::QueryContext> {
        ::db_context_binder::context::create_context(
            ::std::option::Option::Some("h2"),
            self.pool_default.clone(),
            ::db_context_binder::context::Customization::None,
        )
    }
    /// Produces the query context for binding `dsl1`.
    pub fn produce_ca24fe2edc05abf15e6261fe4aa24937b75a70fd(
        &self,
    ) -> ::db_context_binder::error::BinderResult<::db_context_binder::context::QueryContext> {
        ::db_context_binder::context::create_context(
            ::std::option::Option::Some("postgres"),
            self.pool_ca24fe2edc05abf15e6261fe4aa24937b75a70fd.clone(),
            ::db_context_binder::context::Customization::None,
        )
    }
    /// Produces the query context for binding `failing`.
    pub fn produce_5f76b3ec626ebf4e675bd5767dd1671758b70b35(
        &self,
    ) -> ::db_context_binder::error::BinderResult<::db_context_binder::context::QueryContext> {
        let customization = ::db_context_binder::context::Customization::injected(
            self.customization_f526795c95399cea27c055c842c3d6ab018ed0fa.clone(),
        )?;
        ::db_context_binder::context::create_context(
            ::std::option::Option::Some("sqlite"),
            self.pool_5f76b3ec626ebf4e675bd5767dd1671758b70b35.clone(),
            customization,
        )
    }
    /// Produces the query context for binding `injected`.
    pub fn produce_c6c331958744bb3f00902fd3e507045e2fa152ea(
        &self,
    ) -> ::db_context_binder::error::BinderResult<::db_context_binder::context::QueryContext> {
        let customization = ::db_context_binder::context::Customization::injected(
            self.customization_e67d23e7820c49a8051dac2831f38290f5e72f66.clone(),
        )?;
        ::db_context_binder::context::create_context(
            ::std::option::Option::Some("sqlite"),
            self.pool_c6c331958744bb3f00902fd3e507045e2fa152ea.clone(),
            customization,
        )
    }
    /// Produces the query context for binding `keyed`.
    pub fn produce_78da267198b7f49fd64cdfdfaf3e61513a30c5df(
        &self,
    ) -> ::db_context_binder::error::BinderResult<::db_context_binder::context::QueryContext> {
        ::db_context_binder::context::create_context(
            ::std::option::Option::Some("sqlite"),
            self.pool_78da267198b7f49fd64cdfdfaf3e61513a30c5df.clone(),
            ::db_context_binder::context::Customization::key("app.Formatted"),
        )
    }
}
impl ::db_context_binder::context::ProducerComponent for ContextProducer {
    #[allow(unused_variables)]
    fn register(
        self: ::std::sync::Arc<Self>,
        table: &mut ::db_context_binder::context::BindingTable,
    ) {
        {
            let this = ::std::sync::Arc::clone(&self);
            table
                .register(
                    [::db_context_binder::context::Qualifier::Default],
                    ::db_context_binder::context::ProducerScope::Singleton,
                    move || this.produce_default(),
                );
        }
        {
            let this = ::std::sync::Arc::clone(&self);
            table
                .register(
                    [
                        ::db_context_binder::context::Qualifier::Named(
                            ::std::string::String::from("dsl1"),
                        ),
                        ::db_context_binder::context::Qualifier::Binding(
                            ::std::string::String::from("dsl1"),
                        ),
                    ],
                    ::db_context_binder::context::ProducerScope::PerConsumer,
                    move || this.produce_ca24fe2edc05abf15e6261fe4aa24937b75a70fd(),
                );
        }
        {
            let this = ::std::sync::Arc::clone(&self);
            table
                .register(
                    [
                        ::db_context_binder::context::Qualifier::Named(
                            ::std::string::String::from("failing"),
                        ),
                        ::db_context_binder::context::Qualifier::Binding(
                            ::std::string::String::from("failing"),
                        ),
                    ],
                    ::db_context_binder::context::ProducerScope::PerConsumer,
                    move || this.produce_5f76b3ec626ebf4e675bd5767dd1671758b70b35(),
                );
        }
        {
            let this = ::std::sync::Arc::clone(&self);
            table
                .register(
                    [
                        ::db_context_binder::context::Qualifier::Named(
                            ::std::string::String::from("injected"),
                        ),
                        ::db_context_binder::context::Qualifier::Binding(
                            ::std::string::String::from("injected"),
                        ),
                    ],
                    ::db_context_binder::context::ProducerScope::PerConsumer,
                    move || this.produce_c6c331958744bb3f00902fd3e507045e2fa152ea(),
                );
        }
        {
            let this = ::std::sync::Arc::clone(&self);
            table
                .register(
                    [
                        ::db_context_binder::context::Qualifier::Named(
                            ::std::string::String::from("keyed"),
                        ),
                        ::db_context_binder::context::Qualifier::Binding(
                            ::std::string::String::from("keyed"),
                        ),
                    ],
                    ::db_context_binder::context::ProducerScope::PerConsumer,
                    move || this.produce_78da267198b7f49fd64cdfdfaf3e61513a30c5df(),
                );
        }
    }
}
