use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// User record in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub user_id: i64,     // unique key
    pub name: String,     // only mutable field
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String, // never exposed in JSON
    pub created_on: Date, // set once at insertion
}

/// Input to `UserRecordStore::insert`; `created_on: None` means today.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub created_on: Option<Date>,
}

/// Count of rows changed by an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowsAffected(pub u64);

impl RowsAffected {
    /// Zero rows means no record matched; callers treat that as a normal outcome.
    pub fn is_not_found(&self) -> bool {
        self.0 == 0
    }
}
