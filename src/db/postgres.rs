use crate::db::models::{Account, AccountStatus};
use crate::db::Storage;
use crate::error::StorageError;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, password_encrypted, balance, status, created_at";

pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Creates the account table if it does not exist yet. Runs once at boot;
    /// there is no migration framework behind this schema.
    pub async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account (
                id BIGSERIAL PRIMARY KEY,
                first_name VARCHAR(50) NOT NULL,
                last_name VARCHAR(50) NOT NULL,
                number BIGINT NOT NULL,
                password_encrypted VARCHAR(100) NOT NULL,
                balance BIGINT NOT NULL DEFAULT 0,
                status VARCHAR(10) NOT NULL DEFAULT 'Active',
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn create_account(&self, account: Account) -> Result<Account, StorageError> {
        let created = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO account
                (first_name, last_name, number, password_encrypted, balance, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(account.status.to_string())
        .bind(account.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(created)
    }

    async fn delete_account(&self, id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn update_account_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE account SET status = $1 WHERE id = $2")
            .bind(status.to_string())
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StorageError> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(accounts)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Account, StorageError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StorageError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE number = $1"
        ))
        .bind(number)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StorageError::NotFound)
    }
}
