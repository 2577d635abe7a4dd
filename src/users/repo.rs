use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::config::DbConfig;
use crate::db::{on_connection, DbConnection};
use crate::users::error::{StoreError, StoreResult};
use crate::users::repo_types::{NewUserRecord, RowsAffected, UserRecord};

/// Schema for the `users` table, for `create-table --users-schema`.
pub const USERS_TABLE_DDL: &str = r#"
CREATE TABLE users (
    user_id    BIGINT PRIMARY KEY,
    name       VARCHAR(100) NOT NULL,
    email      VARCHAR(255) NOT NULL,
    phone      VARCHAR(32)  NOT NULL,
    password   VARCHAR(255) NOT NULL,
    created_on DATE         NOT NULL
)
"#;

const INSERT_USER: &str = r#"
    INSERT INTO users (user_id, name, email, phone, password, created_on)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

const UPDATE_NAME: &str = r#"UPDATE users SET name = $1 WHERE user_id = $2"#;

const DELETE_USER: &str = r#"DELETE FROM users WHERE user_id = $1"#;

const SELECT_USER: &str = r#"
    SELECT user_id, name, email, phone, password, created_on
    FROM users
    WHERE user_id = $1
"#;

/// Data access over the `users` table. Every call opens its own connection
/// and closes it before returning.
#[derive(Debug, Clone)]
pub struct UserRecordStore {
    config: DbConfig,
}

impl UserRecordStore {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Close the connection whatever happened, then surface the statement
    /// result. A failed close is only logged.
    async fn release<T>(conn: DbConnection, result: Result<T, sqlx::Error>) -> StoreResult<T> {
        if let Err(e) = conn.close().await {
            warn!(error = %e, "closing connection failed");
        }
        result.map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> StoreResult<()> {
        let mut conn = DbConnection::open(&self.config).await?;
        let result = conn.ping().await;
        Self::release(conn, result).await.map_err(|e| match e {
            StoreError::Database(inner) => StoreError::Connection(inner),
            other => other,
        })?;
        info!("connection ok");
        Ok(())
    }

    /// Execute a caller-supplied table definition verbatim.
    #[instrument(skip(self, ddl))]
    pub async fn create_table(&self, ddl: &str) -> StoreResult<()> {
        let mut conn = DbConnection::open(&self.config).await?;
        let result = on_connection!(&mut conn, c => sqlx::query(ddl).execute(c).await.map(|_| ()));
        Self::release(conn, result).await?;
        info!("table created");
        Ok(())
    }

    #[instrument(skip(self, record), fields(user_id = record.user_id))]
    pub async fn insert(&self, record: &NewUserRecord) -> StoreResult<()> {
        let created_on = record
            .created_on
            .unwrap_or_else(|| OffsetDateTime::now_utc().date());
        let mut conn = DbConnection::open(&self.config).await?;
        let result = on_connection!(&mut conn, c => sqlx::query(INSERT_USER)
            .bind(record.user_id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.phone)
            .bind(&record.password)
            .bind(created_on)
            .execute(c)
            .await
            .map(|r| r.rows_affected()));
        let rows = Self::release(conn, result).await?;
        info!(rows, %created_on, "user inserted");
        Ok(())
    }

    #[instrument(skip(self, new_name))]
    pub async fn update_name(&self, user_id: i64, new_name: &str) -> StoreResult<RowsAffected> {
        let mut conn = DbConnection::open(&self.config).await?;
        let result = on_connection!(&mut conn, c => sqlx::query(UPDATE_NAME)
            .bind(new_name)
            .bind(user_id)
            .execute(c)
            .await
            .map(|r| r.rows_affected()));
        let rows = RowsAffected(Self::release(conn, result).await?);
        if rows.is_not_found() {
            debug!("no user matched");
        } else {
            info!(rows = rows.0, "name updated");
        }
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, user_id: i64) -> StoreResult<RowsAffected> {
        let mut conn = DbConnection::open(&self.config).await?;
        let result = on_connection!(&mut conn, c => sqlx::query(DELETE_USER)
            .bind(user_id)
            .execute(c)
            .await
            .map(|r| r.rows_affected()));
        let rows = RowsAffected(Self::release(conn, result).await?);
        if rows.is_not_found() {
            debug!("no user matched");
        } else {
            info!(rows = rows.0, "user deleted");
        }
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, user_id: i64) -> StoreResult<Option<UserRecord>> {
        let mut conn = DbConnection::open(&self.config).await?;
        let result = on_connection!(&mut conn, c => sqlx::query_as::<_, UserRecord>(SELECT_USER)
            .bind(user_id)
            .fetch_optional(c)
            .await);
        Self::release(conn, result).await
    }
}
