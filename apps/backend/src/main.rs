use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use duel_backend::config::AppConfig;
use duel_backend::middleware::cors::cors_middleware;
use duel_backend::middleware::request_trace::RequestTrace;
use duel_backend::middleware::structured_logger::StructuredLogger;
use duel_backend::middleware::trace_span::TraceSpan;
use duel_backend::routes;
use duel_backend::services::janitor::spawn_janitor;
use duel_backend::state::build_state;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let idle_policy = config.idle_policy();
    let janitor_every = config.janitor_interval();
    let shutdown_timeout = config.shutdown_timeout_secs;

    let app_state = match build_state().with_config(config).build() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %host,
        port,
        cards = app_state.catalog.len(),
        "Starting duel backend"
    );

    let janitor = spawn_janitor(Arc::clone(&app_state.flow), idle_policy, janitor_every);
    let registry = Arc::clone(&app_state.registry);
    let origins = app_state.config.cors_allowed_origins.clone();

    let data = web::Data::new(app_state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(cors_middleware(&origins))
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .disable_signals()
    .shutdown_timeout(shutdown_timeout)
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received; closing websockets");
        registry.shutdown_all();
        handle.stop(true).await;
    });

    let result = server.await;
    janitor.abort();
    info!("Duel backend stopped");
    result
}
