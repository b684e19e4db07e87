//! Error types for the binder.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Build-time problems that still allow a partial result are reported as
//! [`ValidationWarning`](crate::synth::ValidationWarning)s instead; everything here is
//! either fatal for the build or fatal for the producer that raised it.

use std::sync::Arc;
use thiserror::Error;

/// Boxed error produced by user-supplied customization factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared form of a [`BoxError`], so errors can be cloned into every failing lookup.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug, Clone)]
pub enum BinderError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(
        "Identifier collision: '{identifier}' is already allocated to '{existing}', cannot allocate it to '{requested}'"
    )]
    IdentifierCollision {
        identifier: String,
        existing: String,
        requested: String,
    },

    #[error("Code generation failed for '{component}': {message}")]
    Codegen { component: String, message: String },

    #[error("Failed to load generated component '{component}': {message}")]
    Loader { component: String, message: String },

    #[error("Missing required argument '{argument}' while creating a query context")]
    MissingArgument { argument: &'static str },

    #[error("Customization '{key}' is not registered")]
    CustomizationNotFound { key: String },

    #[error("Customization '{key}' failed to instantiate: {source}")]
    CustomizationFailed {
        key: String,
        #[source]
        source: SharedError,
    },

    #[error("Dialect '{dialect}' cannot run on a {pool_type} pool")]
    UnsupportedDialect { dialect: String, pool_type: String },

    #[error("No producer registered for {qualifier}")]
    ProducerNotFound { qualifier: String },

    #[error("Pool '{pool}' not found")]
    PoolNotFound { pool: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BinderError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an identifier collision error.
    pub fn identifier_collision(
        identifier: impl Into<String>,
        existing: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        Self::IdentifierCollision {
            identifier: identifier.into(),
            existing: existing.into(),
            requested: requested.into(),
        }
    }

    /// Create a code generation error.
    pub fn codegen(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Codegen {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a loader error.
    pub fn loader(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Loader {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a missing argument error.
    pub fn missing_argument(argument: &'static str) -> Self {
        Self::MissingArgument { argument }
    }

    /// Create a customization not found error.
    pub fn customization_not_found(key: impl Into<String>) -> Self {
        Self::CustomizationNotFound { key: key.into() }
    }

    /// Wrap a customization factory failure with the offending key.
    pub fn customization_failed(key: impl Into<String>, source: BoxError) -> Self {
        Self::CustomizationFailed {
            key: key.into(),
            source: Arc::from(source),
        }
    }

    /// Create an unsupported dialect error.
    pub fn unsupported_dialect(dialect: impl Into<String>, pool_type: impl Into<String>) -> Self {
        Self::UnsupportedDialect {
            dialect: dialect.into(),
            pool_type: pool_type.into(),
        }
    }

    /// Create a producer not found error.
    pub fn producer_not_found(qualifier: impl Into<String>) -> Self {
        Self::ProducerNotFound {
            qualifier: qualifier.into(),
        }
    }

    /// Create a pool not found error.
    pub fn pool_not_found(pool: impl Into<String>) -> Self {
        Self::PoolNotFound { pool: pool.into() }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            Self::CustomizationNotFound { .. } => {
                Some("Register the customization in the CustomizationRegistry before start-up")
            }
            Self::UnsupportedDialect { .. } => {
                Some("Bind the producer to a pool whose backend matches the dialect")
            }
            _ => None,
        }
    }

    /// Check if this error aborts the build rather than a single producer.
    pub fn is_build_fatal(&self) -> bool {
        matches!(
            self,
            Self::IdentifierCollision { .. }
                | Self::Codegen { .. }
                | Self::Loader { .. }
                | Self::Config { .. }
                | Self::Internal { .. }
        )
    }
}

/// Convert sqlx errors to BinderError.
impl From<sqlx::Error> for BinderError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => BinderError::connection(
                msg.to_string(),
                "Check the connection string format and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                BinderError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::PoolTimedOut => BinderError::connection(
                "Timed out acquiring a connection from the pool",
                "Raise acquire_timeout or max_connections in the pool URL",
            ),
            sqlx::Error::PoolClosed => {
                BinderError::connection("Connection pool is closed", "Reopen the pool")
            }
            sqlx::Error::Io(io_err) => BinderError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => BinderError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => BinderError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::WorkerCrashed => BinderError::internal("Database worker crashed"),
            _ => BinderError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for BinderError {
    fn from(err: serde_json::Error) -> Self {
        BinderError::config(format!("Invalid bindings document: {}", err))
    }
}

/// Result type alias for binder operations.
pub type BinderResult<T> = Result<T, BinderError>;
