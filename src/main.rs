use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use rustbank::auth::credentials;
use rustbank::db::{Account, Storage};
use rustbank::{api, AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> rustbank::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    // Load and validate configuration; an absent signing secret is fatal here
    // rather than surfacing later as empty-key tokens.
    let config = Settings::new()?;
    config.validate()?;
    info!("configuration loaded");

    // Connect to storage and create the schema (fail-fast boot)
    let state = AppState::new(config.clone()).await?;

    if std::env::args().any(|arg| arg == "--seed") {
        seed_accounts(state.store.as_ref()).await?;
    }

    let state = web::Data::new(state);
    let workers = config.server.workers as usize;
    let cors_enabled = config.cors.enabled;

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    info!(
        "JSON API server listening on {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        let cors = if cors_enabled {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(api::json_config())
            .configure(api::routes)
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}

/// Creates one demo account so a fresh database has something to log into.
async fn seed_accounts(store: &dyn Storage) -> rustbank::Result<()> {
    info!("seeding the database");
    let hash = credentials::hash_password("demo123")?;
    let account = store
        .create_account(Account::new("Gabriel".into(), "Soares".into(), hash))
        .await?;
    info!("seeded account with number {}", account.number);
    Ok(())
}
