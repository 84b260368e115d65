//! Homeboy HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::CommuteService;
use application::ports::CommutePort;
use infrastructure::{AppConfig, CommuteAdapter, Environment, calendar_port_from_config};
use presentation_http::{routes, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the log format can be honoured
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(config.server.json_logs());

    info!("Homeboy v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let environment = config.environment();
    set_expose_internal_errors(environment != Environment::Production);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        %environment,
        calendar = ?config.calendar.source,
        mock_routes = config.commute.use_mocks,
        "Configuration loaded"
    );

    // Initialize adapters
    let calendar = calendar_port_from_config(&config.calendar, config.transit.local_time)
        .map_err(|e| anyhow::anyhow!("Failed to initialize calendar: {e}"))?;

    let commute: Arc<dyn CommutePort> = Arc::new(
        CommuteAdapter::from_config(&config.transit, &config.geocoding, &config.address_matching)
            .map_err(|e| anyhow::anyhow!("Failed to initialize journey planner: {e}"))?,
    );

    // Initialize services
    let commute_service =
        CommuteService::new(calendar, commute).with_mock_routes(config.commute.use_mocks);

    let state = AppState {
        commute_service: Arc::new(commute_service),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let app = if config.server.cors_enabled {
        app.layer(cors_layer(&config.server.allowed_origins))
    } else {
        app
    };

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "homeboy_server=debug,presentation_http=debug,integration_transit=debug,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET])
            .allow_headers(Any)
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
