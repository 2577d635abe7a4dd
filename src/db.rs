use sqlx::{postgres::PgConnection, sqlite::SqliteConnection, Connection};
use tracing::debug;

use crate::config::DbConfig;
use crate::users::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(StoreError::Config(format!(
                "unsupported database url scheme `{other}`"
            ))),
        }
    }
}

/// One live connection, opened for a single operation and closed after it.
pub enum DbConnection {
    Postgres(PgConnection),
    Sqlite(SqliteConnection),
}

/// Runs the same statement code against whichever driver backs the
/// connection. Each arm is type-checked against its own driver.
macro_rules! on_connection {
    ($conn:expr, $c:ident => $body:expr) => {
        match $conn {
            $crate::db::DbConnection::Postgres($c) => $body,
            $crate::db::DbConnection::Sqlite($c) => $body,
        }
    };
}
pub(crate) use on_connection;

impl DbConnection {
    pub async fn open(config: &DbConfig) -> StoreResult<Self> {
        let backend = Backend::from_url(&config.database_url)?;
        debug!(url = %config.redacted_url(), ?backend, "opening connection");
        let conn = match backend {
            Backend::Postgres => PgConnection::connect(&config.database_url)
                .await
                .map(DbConnection::Postgres),
            Backend::Sqlite => SqliteConnection::connect(&config.database_url)
                .await
                .map(DbConnection::Sqlite),
        };
        conn.map_err(StoreError::connect)
    }

    pub async fn ping(&mut self) -> Result<(), sqlx::Error> {
        on_connection!(self, c => c.ping().await)
    }

    pub async fn close(self) -> Result<(), sqlx::Error> {
        on_connection!(self, c => c.close().await)
    }
}
