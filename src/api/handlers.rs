use crate::auth::credentials;
use crate::auth::middleware::{AccountOwner, Authenticated};
use crate::db::models::{Account, AccountStatus};
use crate::error::{AppError, AuthError, StorageError};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub number: i64,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeactivateRequest {
    pub number: i64,
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Exchanges number + password for a bearer token. A successful login on an
/// Inactive account reactivates it; that side effect is intentional domain
/// behavior, not cleanup.
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let account = state
        .store
        .get_account_by_number(req.number)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                AppError::NotFound(format!("account with number {} not found", req.number))
            }
            other => AppError::Storage(other),
        })?;

    if !credentials::verify_password(&account.password_hash, &req.password) {
        warn!("failed login attempt for account number {}", req.number);
        return Err(AppError::Auth(AuthError::BadCredentials));
    }

    let token = state.tokens.issue(&account)?;

    if account.status == AccountStatus::Inactive {
        info!("reactivating account {} on login", account.id);
        state
            .store
            .update_account_status(account.id, AccountStatus::Active)
            .await?;
    }

    info!("login successful for account number {}", account.number);
    Ok(HttpResponse::Ok().json(LoginResponse {
        number: account.number,
        token,
    }))
}

/// Creates an account with a freshly hashed password and a random public
/// number. The response never carries the verifier.
pub async fn create_account(
    req: web::Json<CreateAccountRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let hash = credentials::hash_password(&req.password)?;
    let account = Account::new(req.first_name, req.last_name, hash);

    let created = state.store.create_account(account).await?;
    info!("created account {} with number {}", created.id, created.number);

    Ok(HttpResponse::Ok().json(created))
}

pub async fn list_accounts(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let accounts = state.store.list_accounts().await?;
    Ok(HttpResponse::Ok().json(accounts))
}

/// Protected: the ownership extractor has already loaded the account.
pub async fn get_account(owner: AccountOwner) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(owner.0))
}

/// Protected: deletes the caller's own account by id.
pub async fn delete_account(
    owner: AccountOwner,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = owner.0.id;
    state.store.delete_account(id).await?;
    info!("deleted account {}", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": id })))
}

/// Protected: validates the payload shape and echoes it back. No balance is
/// mutated here; real transfer semantics are out of scope for this version.
pub async fn transfer(
    caller: Authenticated,
    req: web::Json<TransferRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    info!(
        "transfer request from account {}: {} to account {}",
        caller.0.number, req.amount, req.to_account
    );
    Ok(HttpResponse::Ok().json(req))
}

/// Unauthenticated and password-free: anyone who knows a public number can
/// flip the account to Inactive. See DESIGN.md for the trust-boundary note.
pub async fn deactivate_account(
    req: web::Json<DeactivateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let account = state
        .store
        .get_account_by_number(req.number)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                AppError::NotFound(format!("account with number {} not found", req.number))
            }
            other => AppError::Storage(other),
        })?;

    state
        .store
        .update_account_status(account.id, AccountStatus::Inactive)
        .await?;
    info!("deactivated account {}", account.id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "account deactivated"
    })))
}
