//! HTTP API server using axum

use anyhow::{Context, Result};
use aq_db::Database;
use aq_translate::Translator;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::{GlobalArgs, ServeArgs};
use crate::commands::common::{build_translator, connect};
use crate::pipeline::{self, AskResponse, Outcome, Stage};

/// State shared across all handlers
struct AppState {
    db: Arc<dyn Database>,
    translator: Translator,
}

/// Body of POST /nl-to-sql
#[derive(Debug, Deserialize)]
struct QuestionRequest {
    question: String,
}

/// Execute the serve command
pub(crate) async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    let (config, db) = connect(global)?;
    let translator = build_translator(&config)?;

    let host = args.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let app = router(Arc::new(AppState { db, translator }));

    println!("Serving askql API at http://{}:{}", host, port);
    println!("Press Ctrl+C to stop.\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}:{}", host, port))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/db-check", get(db_check))
        .route("/nl-to-sql", post(nl_to_sql))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "API is running" }))
}

async fn db_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.db.ping().await {
        Ok(()) => Json(json!({ "db": "connected" })),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

async fn nl_to_sql(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuestionRequest>,
) -> (StatusCode, Json<AskResponse>) {
    let outcome = pipeline::ask(state.db.as_ref(), &state.translator, &request.question).await;
    (status_for(&outcome), Json(outcome.response))
}

/// Rejected questions are the caller's problem; schema and execution
/// failures are ours.
fn status_for(outcome: &Outcome) -> StatusCode {
    if outcome.is_success() {
        return StatusCode::OK;
    }
    match outcome.stage {
        Stage::Received | Stage::Executed => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
