//! HTTP surface: route registration and request handlers.

pub mod handlers;

use actix_web::web;

pub use handlers::{
    create_account, deactivate_account, delete_account, get_account, health_check, list_accounts,
    login, transfer, CreateAccountRequest, DeactivateRequest, LoginRequest, LoginResponse,
    TransferRequest,
};

/// Registers every route of the API. `/login`, `POST /account`,
/// `GET /account` and `/deactivate` are open; the remaining routes are
/// guarded by the auth extractors in their handler signatures.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/login", web::post().to(login))
        .route("/account", web::get().to(list_accounts))
        .route("/account", web::post().to(create_account))
        .route("/account/{id}", web::get().to(get_account))
        .route("/account/{id}", web::delete().to(delete_account))
        .route("/transfer", web::post().to(transfer))
        .route("/deactivate", web::post().to(deactivate_account));
}

/// JSON extractor configuration routing body-parse failures through the
/// uniform `{"error": ...}` envelope instead of the actix default body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        crate::error::AppError::Validation(err.to_string()).into()
    })
}
