//! Axum-based API Gateway: host surface for the AIML fallback adapter.
//!
//! Plays the assistant-framework role: takes utterances in, matches the
//! reset-memory voice intent, and dispatches everything else to the
//! fallback brain through the orchestrator.

use aimlbot_core::{
    AimlKernel, BrainAdapter, CoreConfig, DeviceApi, Goal, MockKernel, Orchestrator,
    SkillRegistry, TenantContext,
};
use aimlbot_skills::{goal_for_utterance, AimlFallback, ResetMemory};
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CoreConfig::load().expect("load gateway config");
    std::fs::create_dir_all(&config.storage_path).expect("create storage dir");

    let adapter = Arc::new(Mutex::new(BrainAdapter::new(
        &config.aiml_path,
        config.brain_path(),
        config.save_loop_threshold,
        Box::new(|| Box::new(MockKernel::new()) as Box<dyn AimlKernel>),
        Box::new(DeviceApi::from_env()),
    )));

    let mut registry = SkillRegistry::new();
    registry.register(Arc::new(AimlFallback::new(
        Arc::clone(&adapter),
        config.enabled,
    )));
    registry.register(Arc::new(ResetMemory::new(Arc::clone(&adapter))));
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(registry)));

    let app = router(AppState { orchestrator });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await.unwrap(),
        app,
    )
    .with_graceful_shutdown(shutdown_signal(Arc::clone(&adapter)))
    .await
    .unwrap();
}

/// Waits for ctrl-c, then persists the brain before the server drains.
async fn shutdown_signal(adapter: Arc<Mutex<BrainAdapter>>) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down, saving brain");
    if let Err(e) = adapter.lock().await.shutdown() {
        tracing::error!("brain save on shutdown failed: {e}");
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/utterance", post(utterance))
        .route("/v1/execute", post(execute))
        .with_state(state)
}

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

#[derive(serde::Deserialize)]
struct UtteranceRequest {
    tenant_id: String,
    correlation_id: Option<String>,
    utterance: String,
}

#[derive(serde::Deserialize)]
struct ExecuteRequest {
    tenant_id: String,
    correlation_id: Option<String>,
    goal: Goal,
}

/// Utterance intake: intent match first, fallback otherwise.
async fn utterance(
    State(state): State<AppState>,
    Json(req): Json<UtteranceRequest>,
) -> axum::Json<serde_json::Value> {
    let ctx = TenantContext {
        tenant_id: req.tenant_id,
        correlation_id: req.correlation_id,
    };
    let goal = goal_for_utterance(&req.utterance);
    dispatch(&state, &ctx, goal).await
}

/// Raw goal dispatch for host integrations.
async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> axum::Json<serde_json::Value> {
    let ctx = TenantContext {
        tenant_id: req.tenant_id,
        correlation_id: req.correlation_id,
    };
    dispatch(&state, &ctx, req.goal).await
}

async fn dispatch(
    state: &AppState,
    ctx: &TenantContext,
    goal: Goal,
) -> axum::Json<serde_json::Value> {
    match state.orchestrator.dispatch(ctx, goal).await {
        Ok(result) => axum::Json(result),
        Err(e) => axum::Json(serde_json::json!({
            "error": e.to_string(),
            "status": "error"
        })),
    }
}
