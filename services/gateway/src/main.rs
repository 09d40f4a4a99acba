use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway::config::{Config, StoreBackend};
use gateway::engine::policy::ProviderPolicy;
use gateway::provider_api::HttpProviderApi;
use gateway::repository::{MemoryStore, RedisStore};
use gateway::state::{build_engine, AppState, Engines, ProviderStores};
use gateway::wallet::{HttpWalletGateway, WalletGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with JSON formatting (configurable via env)
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string())
        .eq_ignore_ascii_case("json");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gateway=info,tower_http=info".into());

    if use_json {
        // JSON structured logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable logging for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        service = "gateway",
        version = env!("CARGO_PKG_VERSION"),
        log_format = if use_json { "json" } else { "text" },
        "Starting wallet gateway"
    );

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let wallet: Arc<dyn WalletGateway> = Arc::new(HttpWalletGateway::new(
        config.wallet.base_url.clone(),
        config.wallet.timeout_ms,
    )?);
    let provider_api = Arc::new(HttpProviderApi::new(config.provider_api_timeout_ms)?);

    // Each provider gets its own store namespace so external ids and round
    // indexes never collide across integrations.
    let (stores_for, redis_conn) = match config.store.backend {
        StoreBackend::Redis => {
            let redis_client = redis::Client::open(config.store.redis_url.clone())?;
            let conn = redis_client.get_connection_manager().await?;
            tracing::info!("Redis connected");

            let conn_for_stores = conn.clone();
            let make = move |namespace: &str| {
                let store = Arc::new(RedisStore::new(conn_for_stores.clone(), namespace));
                ProviderStores {
                    players: store.clone(),
                    sessions: store.clone(),
                    transactions: store,
                }
            };
            (
                Box::new(make) as Box<dyn Fn(&str) -> ProviderStores>,
                Some(conn),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records do not survive restart");
            let make = |_namespace: &str| {
                let store = Arc::new(MemoryStore::new());
                ProviderStores {
                    players: store.clone(),
                    sessions: store.clone(),
                    transactions: store,
                }
            };
            (Box::new(make) as Box<dyn Fn(&str) -> ProviderStores>, None)
        }
    };

    let engines = Engines {
        gs5: build_engine(
            ProviderPolicy::gs5(),
            wallet.clone(),
            config.credentials.gs5.clone(),
            stores_for("gs5"),
        ),
        hg5: build_engine(
            ProviderPolicy::hg5(),
            wallet.clone(),
            config.credentials.hg5.clone(),
            stores_for("hg5"),
        ),
        pla: build_engine(
            ProviderPolicy::pla(),
            wallet.clone(),
            config.credentials.pla.clone(),
            stores_for("pla"),
        ),
        pca: build_engine(
            ProviderPolicy::pca(),
            wallet.clone(),
            config.credentials.pca.clone(),
            stores_for("pca"),
        ),
    };

    let app_state = AppState::new(engines, provider_api, config.store.backend, redis_conn);

    let app = gateway::build_router(app_state);

    // Start metrics server
    let metrics_handle = tokio::spawn(start_metrics_server(config.metrics_port));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    tracing::info!("Gateway API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    metrics_handle.await??;

    Ok(())
}

async fn start_metrics_server(port: u16) -> anyhow::Result<()> {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    let app = Router::new().route(
        "/metrics",
        get(|| async move { handle.render() }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Metrics server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
