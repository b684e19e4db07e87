//! Runtime query contexts.
//!
//! This module is what generated producers call into:
//! - `customize`: customization hooks and context settings
//! - `registry`: the process-wide customization registry
//! - `container`: binding table, container lookups and injection
//!
//! [`create_context`] binds a dialect, a pool and a customization into a frozen
//! [`QueryContext`].

pub mod container;
pub mod customize;
pub mod registry;

pub use crate::synth::component::{ProducerScope, Qualifier};
pub use container::{
    BindingTable, ContextContainer, DeclarativeComponent, Injector, ProducerComponent,
};
pub use customize::{
    ContextConfiguration, ContextSettings, CustomizationHook, DefaultCustomization, NameStyle,
    SQL_LOG_TARGET, apply_defaults,
};
pub use registry::CustomizationRegistry;

use crate::db::DbPool;
use crate::error::{BinderError, BinderResult};
use crate::impl_db_dispatch;
use crate::models::dialect::resolve as resolve_dialect;
use crate::models::{DatabaseType, SqlDialect};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Customization passed to [`create_context`].
#[derive(Clone, Default)]
pub enum Customization {
    /// A hook instance, applied directly.
    Hook(Arc<dyn CustomizationHook>),
    /// A registry key. An empty key means the default customization.
    Key(String),
    /// The default customization.
    #[default]
    None,
}

impl Customization {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// An injected hook. A failed injection is returned unchanged.
    pub fn injected(hook: BinderResult<Arc<dyn CustomizationHook>>) -> BinderResult<Self> {
        hook.map(Self::Hook)
    }
}

impl fmt::Debug for Customization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hook(_) => f.write_str("Hook(..)"),
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::None => f.write_str("None"),
        }
    }
}

/// A frozen query context bound to one pool.
///
/// Cloning is cheap and clones share the same context.
#[derive(Debug, Clone)]
pub struct QueryContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    configuration: ContextConfiguration,
    pool: DbPool,
}

impl QueryContext {
    fn new(configuration: ContextConfiguration, pool: DbPool) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                configuration,
                pool,
            }),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.inner.configuration.dialect()
    }

    pub fn db_type(&self) -> DatabaseType {
        self.inner.configuration.db_type()
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.inner.configuration.settings
    }

    pub fn pool(&self) -> &DbPool {
        &self.inner.pool
    }

    /// True when both handles refer to the same context.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Check that the pool answers a trivial statement.
    pub async fn ping(&self) -> BinderResult<()> {
        const SQL: &str = "SELECT 1";
        self.log_statement(SQL);
        let fut = async {
            impl_db_dispatch!(self.pool(), {
                MySql(p) => sqlx::query(SQL).execute(p).await.map(|_| ()),
                Postgres(p) => sqlx::query(SQL).execute(p).await.map(|_| ()),
                SQLite(p) => sqlx::query(SQL).execute(p).await.map(|_| ()),
            })
        };
        self.bounded("ping", fut).await
    }

    /// Version string reported by the server.
    pub async fn server_version(&self) -> BinderResult<String> {
        let sql = match self.db_type() {
            DatabaseType::SQLite => "SELECT sqlite_version()",
            DatabaseType::MySQL | DatabaseType::PostgreSQL => "SELECT version()",
        };
        self.log_statement(sql);
        let fut = async {
            impl_db_dispatch!(self.pool(), {
                MySql(p) => sqlx::query_scalar::<_, String>(sql).fetch_one(p).await,
                Postgres(p) => sqlx::query_scalar::<_, String>(sql).fetch_one(p).await,
                SQLite(p) => sqlx::query_scalar::<_, String>(sql).fetch_one(p).await,
            })
        };
        let version = self.bounded("server_version", fut).await?;
        debug!(version = %version, "Got server version");
        Ok(version)
    }

    fn log_statement(&self, sql: &str) {
        if self.settings().execute_logging {
            trace!(target: SQL_LOG_TARGET, dialect = %self.dialect(), sql = %sql, "Executing statement");
        }
    }

    /// Run a database future under the configured query timeout.
    async fn bounded<T, F>(&self, operation: &str, fut: F) -> BinderResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let result = match self.settings().query_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| BinderError::timeout(operation, limit.as_secs()))?,
            None => fut.await,
        };
        Ok(result?)
    }
}

/// Create a query context, resolving customization keys through the process-wide registry.
pub fn create_context(
    dialect: Option<&str>,
    pool: Option<DbPool>,
    customization: Customization,
) -> BinderResult<QueryContext> {
    create_context_with(&CustomizationRegistry::global(), dialect, pool, customization)
}

/// Create a query context, resolving customization keys through `registry`.
///
/// The customization's `apply` runs exactly once, before the context is frozen.
pub fn create_context_with(
    registry: &CustomizationRegistry,
    dialect: Option<&str>,
    pool: Option<DbPool>,
    customization: Customization,
) -> BinderResult<QueryContext> {
    let dialect_name = dialect.ok_or_else(|| BinderError::missing_argument("dialect"))?;
    let pool = pool.ok_or_else(|| BinderError::missing_argument("pool"))?;

    let hook: Arc<dyn CustomizationHook> = match customization {
        Customization::Hook(hook) => hook,
        Customization::Key(key) if key.is_empty() => Arc::new(DefaultCustomization),
        Customization::Key(key) => registry.instantiate(&key)?,
        Customization::None => Arc::new(DefaultCustomization),
    };

    let dialect = resolve_dialect(dialect_name);
    let db_type = pool.db_type();
    if !dialect.supports(db_type) {
        return Err(BinderError::unsupported_dialect(
            dialect.as_str(),
            db_type.display_name(),
        ));
    }

    let mut configuration = ContextConfiguration::new(dialect, db_type);
    hook.apply(&mut configuration);
    debug!(
        dialect = %dialect,
        db_type = %db_type,
        execute_logging = configuration.settings.execute_logging,
        "Created query context"
    );
    Ok(QueryContext::new(configuration, pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    async fn sqlite_pool() -> DbPool {
        DbPool::SQLite(
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .unwrap(),
        )
    }

    #[derive(Default)]
    struct CountingHook {
        calls: AtomicUsize,
    }

    impl CustomizationHook for CountingHook {
        fn apply(&self, configuration: &mut ContextConfiguration) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            configuration.settings.render_formatted = true;
        }
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let registry = CustomizationRegistry::new();
        let err = create_context_with(&registry, None, Some(sqlite_pool().await), Customization::None)
            .unwrap_err();
        assert!(matches!(err, BinderError::MissingArgument { argument: "dialect" }));

        let err = create_context_with(&registry, Some("sqlite"), None, Customization::None)
            .unwrap_err();
        assert!(matches!(err, BinderError::MissingArgument { argument: "pool" }));
    }

    #[tokio::test]
    async fn test_default_customization_applied() {
        let registry = CustomizationRegistry::new();
        let ctx = create_context_with(&registry, Some("sqlite"), Some(sqlite_pool().await), Customization::None)
            .unwrap();
        assert_eq!(ctx.dialect(), SqlDialect::Sqlite);
        assert_eq!(ctx.settings().name_style, NameStyle::AsIs);
        assert_eq!(ctx.settings().query_timeout, Some(Duration::from_secs(60)));

        let empty_key = create_context_with(&registry, Some("sqlite"), Some(sqlite_pool().await), Customization::key(""))
            .unwrap();
        assert_eq!(empty_key.settings(), ctx.settings());
    }

    #[tokio::test]
    async fn test_hook_applied_exactly_once() {
        let hook = Arc::new(CountingHook::default());
        let ctx = create_context_with(
            &CustomizationRegistry::new(),
            Some("h2"),
            Some(sqlite_pool().await),
            Customization::Hook(hook.clone()),
        )
        .unwrap();
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
        assert!(ctx.settings().render_formatted);
        assert_eq!(ctx.dialect(), SqlDialect::H2);
    }

    #[tokio::test]
    async fn test_key_resolution_errors() {
        let registry = CustomizationRegistry::new()
            .with_factory("app.Broken", || Err::<Arc<dyn CustomizationHook>, BoxError>("boom".into()));

        let err = create_context_with(&registry, Some("sqlite"), Some(sqlite_pool().await), Customization::key("app.Missing"))
            .unwrap_err();
        assert!(matches!(err, BinderError::CustomizationNotFound { .. }));

        let err = create_context_with(&registry, Some("sqlite"), Some(sqlite_pool().await), Customization::key("app.Broken"))
            .unwrap_err();
        assert!(matches!(err, BinderError::CustomizationFailed { ref key, .. } if key == "app.Broken"));
    }

    #[tokio::test]
    async fn test_dialect_must_match_pool_backend() {
        let err = create_context_with(
            &CustomizationRegistry::new(),
            Some("postgres"),
            Some(sqlite_pool().await),
            Customization::None,
        )
        .unwrap_err();
        assert!(matches!(err, BinderError::UnsupportedDialect { .. }));
    }

    #[tokio::test]
    async fn test_unknown_dialect_falls_back() {
        let ctx = create_context_with(
            &CustomizationRegistry::new(),
            Some("quel"),
            Some(sqlite_pool().await),
            Customization::None,
        )
        .unwrap();
        assert_eq!(ctx.dialect(), SqlDialect::Default);
    }

    #[test]
    fn test_injected_customization_passes_failure_through() {
        let failed: BinderResult<Arc<dyn CustomizationHook>> = Err(
            BinderError::customization_failed("cfg", "constructor failed".into()),
        );
        let err = Customization::injected(failed).unwrap_err();
        assert!(matches!(err, BinderError::CustomizationFailed { ref key, .. } if key == "cfg"));
        assert!(matches!(
            Customization::injected(Ok(Arc::new(DefaultCustomization))),
            Ok(Customization::Hook(_))
        ));
    }

    #[tokio::test]
    async fn test_ping_and_server_version() {
        let ctx = create_context_with(
            &CustomizationRegistry::new(),
            Some("sqlite"),
            Some(sqlite_pool().await),
            Customization::None,
        )
        .unwrap();
        ctx.ping().await.unwrap();
        let version = ctx.server_version().await.unwrap();
        assert!(version.starts_with('3'));
        assert!(ctx.ptr_eq(&ctx.clone()));
    }
}
