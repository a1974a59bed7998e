//! API endpoints
//!
//! Todas las rutas cuelgan de `/api`. Solo `/api/auth/token` y
//! `/api/health` son públicas; el resto exige un JWT con `schoolId`.

pub mod auth;
pub mod resources;
pub mod teachers;
pub mod transport;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_layer};
use crate::models::StudentRegistration;
use crate::state::AppState;

use resources::resource_router;

/// Crear el router principal de la API
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/transport", transport::create_transport_router())
        .nest("/teachers", teachers::create_teachers_router())
        .nest("/register/student", resource_router::<StudentRegistration>())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::create_auth_router())
        .merge(protected)
}

/// Aplicación completa con estado y capas
pub fn create_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));

    Router::new()
        .nest("/api", create_api_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }
    }))
}
