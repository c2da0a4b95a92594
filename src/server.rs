// Read-only JSON endpoints for dashboards. Nothing here mutates the engine.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::engine::entity::Entity;
use crate::state::{DashboardState, FieldsResponse, LevelsResponse, StatsResponse};

pub type AppState = Arc<DashboardState>;

const DEFAULT_ENTITY_LIMIT: usize = 50;
const MAX_ENTITY_LIMIT: usize = 1_000;

#[derive(Deserialize)]
pub struct EntityParams {
    pub limit: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/entities", get(get_entities))
        .route("/api/fields", get(get_fields))
        .route("/api/levels", get(get_levels))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("[SERVER] 🚀 Stats API running on http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.engine.get_stats(),
        uptime_secs: state.uptime_secs(),
    })
}

async fn get_entities(
    State(state): State<AppState>,
    Query(params): Query<EntityParams>,
) -> Json<Vec<Entity>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ENTITY_LIMIT)
        .min(MAX_ENTITY_LIMIT);
    Json(state.engine.recent_entities(limit))
}

// Summaries walk every element and wait on the fields lock the loop holds
// while perturbing, so they run off the async workers.
async fn get_fields(State(state): State<AppState>) -> Response {
    let engine = state.engine.clone();
    match tokio::task::spawn_blocking(move || engine.field_summaries()).await {
        Ok(fields) => Json(FieldsResponse {
            shape: state.engine.config().field_shape,
            fields,
        })
        .into_response(),
        Err(e) => {
            error!("[SERVER] Field summary task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn get_levels(State(state): State<AppState>) -> Json<LevelsResponse> {
    Json(LevelsResponse {
        levels: state.engine.levels().iter().cloned().collect(),
    })
}
