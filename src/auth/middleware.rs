use crate::auth::token::TokenService;
use crate::db::models::Account;
use crate::db::Storage;
use crate::error::{AppError, AuthError};
use crate::AppState;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

/// Header carrying the bearer token on protected routes.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Result of an authorization check. `Deny` must short-circuit: the router
/// never invokes a protected handler on a denied request.
#[derive(Debug)]
pub enum Outcome {
    Allow(Account),
    Deny(AuthError),
}

/// Ownership check for routes carrying an `{id}` path segment.
///
/// State machine: missing token -> deny; invalid token -> deny; unparseable
/// or unknown account id -> deny (existence is not leaked); claim number not
/// matching the loaded account's number -> deny; otherwise allow with the
/// loaded account.
pub async fn authorize(
    store: &dyn Storage,
    tokens: &TokenService,
    token: Option<&str>,
    path_id: Option<&str>,
) -> Outcome {
    let token = match token {
        Some(t) => t,
        None => return Outcome::Deny(AuthError::MissingToken),
    };

    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => return Outcome::Deny(e),
    };

    let id = match path_id.and_then(|raw| raw.parse::<i64>().ok()) {
        Some(id) => id,
        None => return Outcome::Deny(AuthError::UnknownAccount),
    };

    let account = match store.get_account_by_id(id).await {
        Ok(account) => account,
        Err(_) => return Outcome::Deny(AuthError::UnknownAccount),
    };

    if account.number != claims.account_number {
        return Outcome::Deny(AuthError::OwnershipMismatch);
    }

    Outcome::Allow(account)
}

/// Token check for protected routes without an `{id}` segment: the claim's
/// number must resolve to an existing account, which becomes the caller.
pub async fn authenticate(
    store: &dyn Storage,
    tokens: &TokenService,
    token: Option<&str>,
) -> Outcome {
    let token = match token {
        Some(t) => t,
        None => return Outcome::Deny(AuthError::MissingToken),
    };

    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => return Outcome::Deny(e),
    };

    match store.get_account_by_number(claims.account_number).await {
        Ok(account) => Outcome::Allow(account),
        Err(_) => Outcome::Deny(AuthError::UnknownAccount),
    }
}

fn request_parts(req: &HttpRequest) -> (Option<web::Data<AppState>>, Option<String>, Option<String>) {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let path_id = req.match_info().get("id").map(str::to_owned);
    (state, token, path_id)
}

/// Extractor enforcing the full ownership check before the handler runs.
/// Extraction failure produces the 403 response; the handler body is never
/// entered on a denied request.
pub struct AccountOwner(pub Account);

impl FromRequest for AccountOwner {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let (state, token, path_id) = request_parts(req);
        let path = req.path().to_owned();

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("application state not configured".into()))?;
            debug!("running ownership check for {}", path);

            match authorize(
                state.store.as_ref(),
                &state.tokens,
                token.as_deref(),
                path_id.as_deref(),
            )
            .await
            {
                Outcome::Allow(account) => Ok(AccountOwner(account)),
                Outcome::Deny(reason) => {
                    warn!("denied request to {}: {}", path, reason);
                    Err(AppError::Auth(reason))
                }
            }
        })
    }
}

/// Extractor enforcing token validity (and account existence) for protected
/// routes that carry no account id in the path.
pub struct Authenticated(pub Account);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let (state, token, _) = request_parts(req);
        let path = req.path().to_owned();

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("application state not configured".into()))?;
            debug!("running token check for {}", path);

            match authenticate(state.store.as_ref(), &state.tokens, token.as_deref()).await {
                Outcome::Allow(account) => Ok(Authenticated(account)),
                Outcome::Deny(reason) => {
                    warn!("denied request to {}: {}", path, reason);
                    Err(AppError::Auth(reason))
                }
            }
        })
    }
}
