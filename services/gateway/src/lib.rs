pub mod config;
pub mod credentials;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod provider_api;
pub mod reports;
pub mod repository;
pub mod state;
pub mod wallet;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Full route table: one sub-surface per provider integration, plus the
/// operational endpoints. Callback paths mirror what each provider posts to.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
        // Gs5
        .route("/api/gs5/authenticate", post(handlers::gs5::authenticate))
        .route("/api/gs5/balance", post(handlers::gs5::balance))
        .route("/api/gs5/bet", post(handlers::gs5::bet))
        .route("/api/gs5/result", post(handlers::gs5::result))
        .route("/api/gs5/refund", post(handlers::gs5::refund))
        .route("/api/gs5/launch", post(handlers::gs5::launch))
        .route("/api/gs5/visual", post(handlers::gs5::visual))
        // Hg5
        .route("/api/hg5/auth", post(handlers::hg5::auth))
        .route("/api/hg5/balance", post(handlers::hg5::balance))
        .route("/api/hg5/transaction", post(handlers::hg5::transaction))
        .route("/api/hg5/freegame", post(handlers::hg5::freegame))
        .route("/api/hg5/launch", post(handlers::hg5::launch))
        // Pla
        .route("/api/pla/authenticate", post(handlers::pla::authenticate))
        .route("/api/pla/balance", post(handlers::pla::balance))
        .route("/api/pla/bet", post(handlers::pla::bet))
        .route("/api/pla/gameresult", post(handlers::pla::gameresult))
        .route("/api/pla/refund", post(handlers::pla::refund))
        .route("/api/pla/launch", post(handlers::pla::launch))
        // Pca
        .route("/api/pca/login", post(handlers::pca::login))
        .route("/api/pca/logout", post(handlers::pca::logout))
        .route("/api/pca/balance", post(handlers::pca::balance))
        .route("/api/pca/multi_withdraw", post(handlers::pca::multi_withdraw))
        .route("/api/pca/multi_deposit", post(handlers::pca::multi_deposit))
        // Metrics
        .route("/metrics", get(handlers::metrics::metrics_handler))
        // State
        .with_state(state)
        // Middleware
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
