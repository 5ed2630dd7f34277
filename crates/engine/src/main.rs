//! Gamenight Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamenight_domain::{DomainError, TerrainCatalog};
use gamenight_engine::infrastructure::{
    clock::SystemClock, persistence::JsonFilePersistence, ports::ClockPort, FsTerrainCatalog,
    StateStore,
};
use gamenight_engine::{api, App, EngineConfig, EngineError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamenight_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gamenight Engine");

    let config = EngineConfig::from_env();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        maps_dir = %config.maps_dir.display(),
        narrator = %config.narrator_id,
        turn_timeout_secs = config.turn_timeout_secs,
        "Configuration loaded"
    );

    // Session record
    let persistence = Arc::new(JsonFilePersistence::new(&config.data_dir));
    tracing::info!(path = %persistence.state_path().display(), "Loading session state");
    let store = Arc::new(StateStore::open(persistence).await?);
    match store.read().await {
        Some(record) => tracing::info!(
            adventure = %record.session().adventure,
            mode = %record.mode(),
            active = record.session().is_active(),
            "Resumed session"
        ),
        None => tracing::info!("No session on disk; waiting for init"),
    }

    // Terrain
    let terrain = Arc::new(FsTerrainCatalog::new(&config.maps_dir));
    let loaded = terrain.preload();
    tracing::info!(maps = loaded, "Terrain preloaded");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let terrain: Arc<dyn TerrainCatalog> = terrain;
    let app = Arc::new(App::new(&config, store, clock, terrain));

    // Spawn turn timer
    let timer_app = app.clone();
    let timer_interval = config.timer_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(timer_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match timer_app.use_cases.turn.auto_advance.execute().await {
                Ok(_) => {}
                // Nothing to time until the next init
                Err(EngineError::Domain(DomainError::NoActiveSession)) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Turn timer check failed");
                }
            }
        }
    });

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    // The overlay polls status and the transport posts JSON commands.
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
