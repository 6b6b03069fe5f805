/*
 * Responsibility
 * - load Config -> build dependencies (store, verifier) -> assemble the Router
 * - apply middleware (security headers / CORS / request id / trace)
 * - start axum::serve()
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware, repos,
    services::auth::build_token_verifier,
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,posts_manager=debug,tower_http=debug
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
        // stderr may be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting posts-manager in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!("server is running on {}", config.addr);

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let store = repos::connect(&config.database_url)
        .await
        .context("opening post store")?;
    tracing::info!(backend = store.backend_name(), "post store ready");

    let verifier = build_token_verifier(config)
        .await
        .context("building token verifier")?;

    Ok(AppState::new(store, verifier))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone()).with_state(state);

    let router = if config.app_env.is_production() {
        api::frontend::apply(router, &config.static_dir)
    } else {
        router
    };

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
