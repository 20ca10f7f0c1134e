use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

/// Public account number range. The number is the login-facing handle and is
/// assigned at random; uniqueness is not enforced beyond what storage does.
pub const ACCOUNT_NUMBER_RANGE: std::ops::Range<i64> = 0..100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "Active"),
            AccountStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(AccountStatus::Active),
            "Inactive" => Ok(AccountStatus::Inactive),
            other => Err(format!("unknown account status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    /// bcrypt verifier; opaque to callers and never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub balance: i64,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Builds a new Active account with a random public number. The id stays
    /// zero until storage assigns one on insert.
    pub fn new(first_name: String, last_name: String, password_hash: String) -> Self {
        Self {
            id: 0,
            first_name,
            last_name,
            number: rand::thread_rng().gen_range(ACCOUNT_NUMBER_RANGE),
            password_hash,
            balance: 0,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<AccountStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: e.into(),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            number: row.try_get("number")?,
            password_hash: row.try_get("password_encrypted")?,
            balance: row.try_get("balance")?,
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new("Ana".into(), "Lima".into(), "$2b$12$fakehash".into());
        assert_eq!(account.id, 0);
        assert_eq!(account.balance, 0);
        assert_eq!(account.status, AccountStatus::Active);
        assert!(ACCOUNT_NUMBER_RANGE.contains(&account.number));
    }

    #[test]
    fn test_account_serialization_omits_password() {
        let account = Account::new("Ana".into(), "Lima".into(), "$2b$12$fakehash".into());
        let json = serde_json::to_value(&account).unwrap();

        assert!(json.get("password_hash").is_none());
        assert!(json.get("password_encrypted").is_none());
        assert_eq!(json["first_name"], "Ana");
        assert_eq!(json["status"], "Active");
        assert!(json["number"].is_i64());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("Active".parse::<AccountStatus>().unwrap(), AccountStatus::Active);
        assert_eq!("Inactive".parse::<AccountStatus>().unwrap(), AccountStatus::Inactive);
        assert!("Closed".parse::<AccountStatus>().is_err());
        assert_eq!(AccountStatus::Inactive.to_string(), "Inactive");
    }
}
