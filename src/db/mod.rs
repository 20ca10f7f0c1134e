//! Persistence gateway for account records.
//!
//! The `Storage` trait is the narrow interface everything above the database
//! consumes; `PgStore` is the relational implementation and `MemoryStore` an
//! in-process substitute used by the test suites.

pub mod memory;
pub mod models;
pub mod postgres;

use crate::error::StorageError;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use models::{Account, AccountStatus};
pub use postgres::PgStore;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Persists a new account and returns it with its storage-assigned id.
    async fn create_account(&self, account: Account) -> Result<Account, StorageError>;

    async fn delete_account(&self, id: i64) -> Result<(), StorageError>;

    async fn update_account_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Result<(), StorageError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StorageError>;

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StorageError>;

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StorageError>;
}
