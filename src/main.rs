use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use http::HeaderValue;
use tokio::sync::mpsc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use atelier_api::config::{self, AppConfig};
use atelier_api::handlers::AppServices;
use atelier_api::{db, events, openapi, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = db::connect(&cfg.database).await?;
    if cfg.auto_migrate {
        db::run_migrations(&pool).await?;
    }
    let pool = Arc::new(pool);

    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let event_sender = Arc::new(events::EventSender::new(event_tx));
    tokio::spawn(events::process_events(event_rx));

    let state = AppState {
        db: pool.clone(),
        config: cfg.clone(),
        event_sender: Some(event_sender.clone()),
        services: AppServices::new(pool, Some(event_sender)),
    };

    let cors = build_cors(&cfg)?;
    let app = Router::new()
        .route("/", get(|| async { "atelier-api up" }))
        .nest("/api/v1", atelier_api::api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "atelier-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// CORS policy: explicit origins when configured, permissive only in
/// development; anything else is a startup error.
fn build_cors(cfg: &AppConfig) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if !origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    if cfg.is_development() {
        info!("using permissive CORS (development)");
        return Ok(CorsLayer::permissive());
    }
    Err("missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS".into())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received, draining");
}
