//! HTTP service binary exposing the retrieval-augmented query pipeline.
//!
//! # Endpoints
//!
//! - `POST /submit_query` runs a question through the full pipeline
//! - `GET /health` is the liveness probe
//!
//! # Environment
//!
//! - `FLEETRAG_LOG`: logging filter (trace, debug, info, warn, error)
//! - `FLEETRAG_SERVICE_HOST` / `FLEETRAG_SERVICE_PORT`: bind address
//! - see `settings.rs` for the outbound endpoint variables

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use fleetrag::application::{ErrorResponse, QueryRequest, QueryResponse, QueryService};
use fleetrag::domain::DomainError;
use fleetrag::settings::Settings;
use fleetrag::{build_environment, init_tracing};

#[derive(Clone)]
struct AppState {
    service: Arc<QueryService>,
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fleetrag"
    }))
}

async fn submit_query(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let service = Arc::clone(&state.service);

    // The pipeline is synchronous end to end, so it runs on the blocking
    // pool; each in-flight query stays fully isolated.
    let result = tokio::task::spawn_blocking(move || service.answer(payload))
        .await
        .map_err(|err| internal_error(format!("query task failed: {err}")))?;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!("query failed: {err}");
            Err(error_response(err))
        }
    }
}

fn error_response(err: DomainError) -> (StatusCode, Json<ErrorResponse>) {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

fn internal_error(message: String) -> (StatusCode, Json<ErrorResponse>) {
    error!("{message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}

async fn run_service() -> Result<()> {
    init_tracing();

    info!(
        "starting fleetrag query service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Settings::from_env();
    let handles = build_environment(settings).context("failed to bootstrap query service")?;

    let addr: SocketAddr = format!("{}:{}", handles.settings.host, handles.settings.port)
        .parse()
        .context("invalid bind address")?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/submit_query", post(submit_query))
        .with_state(AppState {
            service: handles.service,
        });

    info!(
        %addr,
        index = %handles.settings.search_index,
        "query service listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind service address")?;
    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_service().await {
        eprintln!("[fleetrag] service failed: {err:?}");
        std::process::exit(1);
    }
}
