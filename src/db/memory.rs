use crate::db::models::{Account, AccountStatus};
use crate::db::Storage;
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// In-process storage backend. Substitutes for `PgStore` in the test suites;
/// behavior mirrors the relational gateway, including NotFound semantics.
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<i64, Account>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn create_account(&self, mut account: Account) -> Result<Account, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        account.id = id;
        self.accounts.write().await.insert(id, account.clone());
        Ok(account)
    }

    async fn delete_account(&self, id: i64) -> Result<(), StorageError> {
        // Deleting an unknown id is a no-op, matching the relational store.
        self.accounts.write().await.remove(&id);
        Ok(())
    }

    async fn update_account_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(StorageError::NotFound)?;
        account.status = status;
        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StorageError> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StorageError> {
        self.accounts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StorageError> {
        self.accounts
            .read()
            .await
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(first: &str) -> Account {
        Account::new(first.into(), "Tester".into(), "$2b$12$fakehash".into())
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create_account(account("Ana")).await.unwrap();
        let b = store.create_account(account("Bruno")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_number() {
        let store = MemoryStore::new();
        let created = store.create_account(account("Ana")).await.unwrap();

        let by_id = store.get_account_by_id(created.id).await.unwrap();
        assert_eq!(by_id.number, created.number);

        let by_number = store.get_account_by_number(created.number).await.unwrap();
        assert_eq!(by_number.id, created.id);

        assert!(matches!(
            store.get_account_by_id(999).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_status_update_round_trip() {
        let store = MemoryStore::new();
        let created = store.create_account(account("Ana")).await.unwrap();

        store
            .update_account_status(created.id, AccountStatus::Inactive)
            .await
            .unwrap();

        let fetched = store.get_account_by_id(created.id).await.unwrap();
        assert_eq!(fetched.status, AccountStatus::Inactive);
    }

    #[tokio::test]
    async fn test_delete_removes_account() {
        let store = MemoryStore::new();
        let created = store.create_account(account("Ana")).await.unwrap();

        store.delete_account(created.id).await.unwrap();
        assert!(matches!(
            store.get_account_by_id(created.id).await,
            Err(StorageError::NotFound)
        ));

        // Unknown ids are not an error.
        assert!(store.delete_account(999).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for name in ["Ana", "Bruno", "Carla"] {
            store.create_account(account(name)).await.unwrap();
        }
        let all = store.list_accounts().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }
}
