//! Customization hooks and the settings they adjust.

use crate::models::{DatabaseType, SqlDialect};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Level;

/// Target SQL execution logging is emitted on.
pub const SQL_LOG_TARGET: &str = "db_context_binder::sql";

/// Query timeout applied by the default customization.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;

/// How identifiers are rendered into SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    #[default]
    Quoted,
    AsIs,
    Lower,
    Upper,
}

/// Rendering and execution settings of a query context.
///
/// `Default` is the uncustomized baseline. [`apply_defaults`] turns it into the
/// binder's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    pub render_catalog: bool,
    pub render_schema: bool,
    pub render_formatted: bool,
    pub name_style: NameStyle,
    /// Log every executed statement on [`SQL_LOG_TARGET`].
    pub execute_logging: bool,
    /// `None` means no timeout.
    pub query_timeout: Option<Duration>,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            render_catalog: true,
            render_schema: true,
            render_formatted: false,
            name_style: NameStyle::Quoted,
            execute_logging: false,
            query_timeout: None,
        }
    }
}

/// Mutable configuration handed to a [`CustomizationHook`] before the context is frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfiguration {
    dialect: SqlDialect,
    db_type: DatabaseType,
    pub settings: ContextSettings,
}

impl ContextConfiguration {
    pub fn new(dialect: SqlDialect, db_type: DatabaseType) -> Self {
        Self {
            dialect,
            db_type,
            settings: ContextSettings::default(),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Backend of the pool the context is bound to.
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }
}

/// Adjusts a context configuration once, before the context is built.
///
/// The provided `apply` installs the binder defaults; implementations that override it
/// replace them and may call [`apply_defaults`] themselves.
pub trait CustomizationHook: Send + Sync {
    fn apply(&self, configuration: &mut ContextConfiguration) {
        apply_defaults(configuration);
    }
}

/// The customization used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCustomization;

impl CustomizationHook for DefaultCustomization {}

/// Install the binder defaults into a configuration.
pub fn apply_defaults(configuration: &mut ContextConfiguration) {
    let settings = &mut configuration.settings;
    settings.render_catalog = false;
    settings.render_schema = false;
    settings.render_formatted = false;
    settings.name_style = NameStyle::AsIs;
    settings.execute_logging = tracing::enabled!(target: SQL_LOG_TARGET, Level::TRACE);
    settings.query_timeout = Some(Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS));
}
