pub mod error;
pub mod password;
pub mod repo;
pub mod repo_types;

pub use error::StoreError;
pub use repo::{UserRecordStore, USERS_TABLE_DDL};
pub use repo_types::NewUserRecord;
