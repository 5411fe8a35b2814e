//! HTTP server: routing, request parsing, and JSON responses.
//!
//! ## Routes
//!
//! | Method | Path            | Handler                                   |
//! |--------|-----------------|-------------------------------------------|
//! | GET    | `/`             | Gallery page over the current listing     |
//! | GET    | `/api/list`     | `{"files": [...]}`                        |
//! | DELETE | `/api/delete`   | Move `?name=` into `deleted/`             |
//! | POST   | `/api/favorite` | Copy `?name=` into `favorites/`           |
//! | *      | `/api/*`        | 404 JSON                                  |
//! | *      | anything else   | Static files from the served directory    |
//!
//! ## Status Codes
//!
//! | Error              | Status |
//! |--------------------|--------|
//! | `MissingFilename`  | 400    |
//! | `UnsupportedType`  | 400    |
//! | `InvalidPath`      | 403    |
//! | `PermissionDenied` | 403    |
//! | `NotFound`         | 404    |
//! | `Server`           | 500    |
//!
//! Filesystem work runs on tokio's blocking pool. A client that disconnects
//! mid-request does not cancel it.

use crate::operations::{FileOperations, OperationError};
use crate::render;
use crate::types::{MediaList, OperationResult};
use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("could not bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

type SharedOps = Arc<FileOperations>;

/// Build the application router for one served root.
pub fn router(ops: FileOperations) -> Router {
    let static_files = ServeDir::new(ops.root().path());

    let api = Router::new()
        .route("/list", get(list_media).fallback(api_not_found))
        .route("/delete", delete(delete_file).fallback(api_not_found))
        .route("/favorite", post(favorite_file).fallback(api_not_found))
        .fallback(api_not_found);

    Router::new()
        .route("/", get(gallery_page))
        .nest("/api", api)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(ops))
}

/// Bind `host:port`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, ServeError> {
    TcpListener::bind((host, port))
        .await
        .map_err(|source| ServeError::Bind {
            addr: format!("{host}:{port}"),
            source,
        })
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    ops: FileOperations,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServeError> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, root = %ops.root().path().display(), "HTTP server listening");

    axum::serve(listener, router(ops))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// -- Page --

async fn gallery_page(State(ops): State<SharedOps>) -> Html<String> {
    let files = listing(ops).await;
    Html(render::render_gallery(&files).into_string())
}

// -- API handlers --

async fn list_media(State(ops): State<SharedOps>) -> Json<MediaList> {
    Json(MediaList {
        files: listing(ops).await,
    })
}

async fn delete_file(State(ops): State<SharedOps>, RawQuery(query): RawQuery) -> Response {
    let name = name_param(query.as_deref());
    let target = name.clone();
    let result = run_blocking(move || ops.delete(&target)).await;
    respond("delete", &name, result.map(OperationResult::from))
}

async fn favorite_file(State(ops): State<SharedOps>, RawQuery(query): RawQuery) -> Response {
    let name = name_param(query.as_deref());
    let target = name.clone();
    let result = run_blocking(move || ops.favorite(&target)).await;
    respond("favorite", &name, result.map(OperationResult::from))
}

async fn api_not_found() -> Response {
    let body = OperationResult {
        ok: false,
        error: Some("Not Found".to_string()),
        overwritten: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

// -- Helpers --

async fn listing(ops: SharedOps) -> Vec<String> {
    match tokio::task::spawn_blocking(move || ops.list()).await {
        Ok(files) => files,
        Err(err) => {
            tracing::error!(error = %err, "listing task failed");
            Vec::new()
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, OperationError>
where
    F: FnOnce() -> Result<T, OperationError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|err| Err(OperationError::Server(err.to_string())))
}

fn respond(
    action: &'static str,
    name: &str,
    result: Result<OperationResult, OperationError>,
) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            if err.is_client_error() {
                tracing::warn!(action, name, error = %err, "request rejected");
            } else {
                tracing::error!(action, name, error = %err, "request failed");
            }
            (status_for(&err), Json(OperationResult::failed(&err))).into_response()
        }
    }
}

pub fn status_for(err: &OperationError) -> StatusCode {
    match err {
        OperationError::MissingFilename | OperationError::UnsupportedType => {
            StatusCode::BAD_REQUEST
        }
        OperationError::InvalidPath | OperationError::PermissionDenied => StatusCode::FORBIDDEN,
        OperationError::NotFound => StatusCode::NOT_FOUND,
        OperationError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// First `name=` value of a raw query string, still percent-encoded.
///
/// Only form-style `+` is turned into `%20` here; percent-decoding is left to
/// [`crate::resolve`] so it happens exactly once.
pub fn name_param(query: Option<&str>) -> String {
    query
        .unwrap_or_default()
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == "name")
        .map(|(_, value)| value.replace('+', "%20"))
        .unwrap_or_default()
}
