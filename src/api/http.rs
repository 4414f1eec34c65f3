//! HTTP transport: axum routes over a cellar [`Service`].
//!
//! - `GET /health` returns `{ "ok": true, "commands": [...] }`.
//! - `GET /api/bottles` lists the bottle ledger.
//! - `POST /api/bottles` adds bottles (`{ wineId, count?, location? }`).
//! - `POST /api/commands/:command` dispatches any registered command.
//!
//! The `x-cellar-user-id` header becomes the [`Session`] user.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::error::HandlerError;
use super::handlers::BOTTLE_PLACE;
use super::service::Service;
use super::session::Session;
use crate::cellar::Cellar;
use crate::lock::LockManager;
use crate::store::Store;

type SharedService<S, M> = Arc<Service<Cellar<S, M>>>;

pub fn router<S, M>(service: SharedService<S, M>) -> Router
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    Router::new()
        .route("/health", get(health_handler::<S, M>))
        .route(
            "/api/bottles",
            get(list_bottles::<S, M>).post(add_bottles::<S, M>),
        )
        .route("/api/commands/:command", post(command_handler::<S, M>))
        .with_state(service)
}

/// Serve on `addr` until Ctrl-C.
pub async fn serve<S, M>(service: SharedService<S, M>, addr: &str) -> Result<(), std::io::Error>
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "cellar api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn health_handler<S, M>(State(service): State<SharedService<S, M>>) -> impl IntoResponse
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    Json(json!({ "ok": true, "commands": service.commands() }))
}

async fn list_bottles<S, M>(State(service): State<SharedService<S, M>>) -> Response
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    match service.backend().bottles() {
        Ok(bottles) => Json(bottles).into_response(),
        Err(e) => error_response(HandlerError::from(e)),
    }
}

async fn add_bottles<S, M>(
    State(service): State<SharedService<S, M>>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    match service.dispatch(BOTTLE_PLACE, input, session_from_headers(&headers)) {
        Ok(value) => (StatusCode::CREATED, Json(value)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn command_handler<S, M>(
    State(service): State<SharedService<S, M>>,
    Path(command): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    match service.dispatch(&command, input, session_from_headers(&headers)) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: HandlerError) -> Response {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

fn session_from_headers(headers: &HeaderMap) -> Session {
    Session::from_headers(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
    )
}
