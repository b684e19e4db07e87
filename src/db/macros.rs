//! Pool dispatch macro.
//!
//! Generates one match arm per [`DbPool`](crate::db::DbPool) variant so backend-specific
//! code stays linear.

/// Macro for generating database dispatch match arms.
///
/// # Example
///
/// ```ignore
/// impl_db_dispatch!(pool, {
///     MySql(p) => ping_mysql(p),
///     Postgres(p) => ping_postgres(p),
///     SQLite(p) => ping_sqlite(p),
/// });
/// ```
#[macro_export]
macro_rules! impl_db_dispatch {
    ($pool:expr, { $($variant:ident($p:ident) => $body:expr),+ $(,)? }) => {
        match $pool {
            $(
                $crate::db::pool::DbPool::$variant($p) => $body,
            )+
        }
    };
}

pub use impl_db_dispatch;

#[cfg(test)]
mod tests {
    use crate::db::DbPool;
    use crate::models::DatabaseType;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_dispatch_selects_variant() {
        let pool = DbPool::SQLite(
            SqlitePoolOptions::new()
                .connect("sqlite::memory:")
                .await
                .unwrap(),
        );
        let db_type = impl_db_dispatch!(&pool, {
            MySql(_p) => DatabaseType::MySQL,
            Postgres(_p) => DatabaseType::PostgreSQL,
            SQLite(_p) => DatabaseType::SQLite,
        });
        assert_eq!(db_type, pool.db_type());
    }
}
