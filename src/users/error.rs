use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by `UserRecordStore`. A zero-row update or delete is
/// not one of them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection string names no supported backend
    #[error("configuration error: {0}")]
    Config(String),

    /// Store unreachable, bad credentials or unknown database
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Duplicate key or another constraint rejected the write
    #[error("constraint violation: {0}")]
    Conflict(#[source] sqlx::Error),

    /// Malformed or invalid statement
    #[error("SQL error: {0}")]
    Syntax(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Every failure while opening a connection is a connection error,
    /// whatever the driver reports.
    pub fn connect(err: sqlx::Error) -> Self {
        StoreError::Connection(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Connection,
    Conflict,
    Syntax,
    Other,
}

fn classify_postgres(sqlstate: &str) -> Class {
    match sqlstate.get(..2) {
        Some("08") | Some("28") => Class::Connection,
        _ if sqlstate == "3D000" => Class::Connection,
        Some("23") => Class::Conflict,
        Some("42") => Class::Syntax,
        _ => Class::Other,
    }
}

// SQLite reports extended result codes; the low byte is the primary code.
fn classify_sqlite(code: &str) -> Class {
    match code.parse::<i32>().map(|c| c & 0xff) {
        Ok(19) => Class::Conflict,
        Ok(1) => Class::Syntax,
        Ok(14) | Ok(26) => Class::Connection,
        _ => Class::Other,
    }
}

fn classify_database(err: &(dyn DatabaseError + 'static)) -> Class {
    match err.kind() {
        ErrorKind::UniqueViolation
        | ErrorKind::ForeignKeyViolation
        | ErrorKind::NotNullViolation
        | ErrorKind::CheckViolation => return Class::Conflict,
        _ => {}
    }
    let Some(code) = err.code() else {
        return Class::Other;
    };
    if err.try_downcast_ref::<PgDatabaseError>().is_some() {
        classify_postgres(&code)
    } else {
        classify_sqlite(&code)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let class = match &err {
            sqlx::Error::Database(db) => classify_database(db.as_ref()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Class::Connection,
            _ => Class::Other,
        };
        match class {
            Class::Connection => StoreError::Connection(err),
            Class::Conflict => StoreError::Conflict(err),
            Class::Syntax => StoreError::Syntax(err),
            Class::Other => StoreError::Database(err),
        }
    }
}
