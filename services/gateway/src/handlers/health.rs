use axum::{extract::State, Json};
use redis::AsyncCommands;
use serde_json::{json, Value};

use crate::config::StoreBackend;
use crate::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn detailed_health(State(state): State<AppState>) -> Json<Value> {
    let store_healthy = match (state.store_backend, state.redis.clone()) {
        (StoreBackend::Memory, _) => true,
        (StoreBackend::Redis, Some(mut conn)) => conn
            .get::<_, Option<String>>("_health_check")
            .await
            .is_ok(),
        (StoreBackend::Redis, None) => false,
    };

    Json(json!({
        "status": if store_healthy { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "store": if store_healthy { "healthy" } else { "unhealthy" },
        }
    }))
}
