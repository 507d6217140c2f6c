/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → dependencies → Router
 * - middleware order: authorize < authenticate < problem < cors/security/http
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::repos::{PgBoatRepo, PgUserRepo};
use crate::services::auth::{BcryptHasher, build_auth};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,boat_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = apply_transport(build_router(state), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    let auth = build_auth(
        config.signing_key.clone(),
        config.token_validity_seconds,
        Arc::new(PgUserRepo::new(db.clone())),
        Arc::new(BcryptHasher::new(config.bcrypt_cost)),
    )?;

    tracing::info!(
        validity_seconds = config.token_validity_seconds,
        "authentication ready"
    );

    Ok(AppState::new(auth, Arc::new(PgBoatRepo::new(db))))
}

/// Routes plus the auth and error layers. Transport layers are added by the
/// caller, so tests can drive this router directly.
pub fn build_router(state: AppState) -> Router {
    let router = api::routes();
    let router = middleware::auth::access::apply(router, state.clone());
    let router = middleware::problem::apply(router, state.clone());
    router.with_state(state)
}

fn apply_transport(router: Router, config: &Config) -> Router {
    let router = middleware::cors::apply(router, config);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, config)
}
