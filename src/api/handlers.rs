//! HTTP request handlers for the report browsing API.
//!
//! This module contains the handler functions for all API endpoints.

use std::path::Path;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::EngineError;

use super::response::{ApiErrorResponse, ReportEntry};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/logs", get(list_logs_handler))
        .route("/logs/:file", get(log_file_handler))
        .route("/reports", get(list_report_folders_handler))
        .route("/reports/:folder", get(list_reports_handler))
        .route("/reports/:folder/:file", get(report_file_handler))
        .with_state(state)
}

/// Rejects names that could escape the served directory.
fn checked_name(name: &str) -> Result<&str, ApiErrorResponse> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ApiErrorResponse::invalid_name(name));
    }
    Ok(name)
}

/// Lists entry names in `dir`, sorted. A missing directory lists as empty.
async fn list_names(
    dir: &Path,
    want_dirs: bool,
    extension: Option<&str>,
) -> Result<Vec<String>, ApiErrorResponse> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(EngineError::io(dir, e).into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| EngineError::io(dir, e))?
    {
        let path = entry.path();
        if path.is_dir() != want_dirs {
            continue;
        }
        if let Some(ext) = extension {
            if path.extension().is_none_or(|e| e != ext) {
                continue;
            }
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ApiErrorResponse> {
    tokio::fs::read(path)
        .await
        .map_err(|e| EngineError::io(path, e).into())
}

/// Handler for GET /logs.
async fn list_logs_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiErrorResponse> {
    let names = list_names(state.logs_dir(), false, Some("txt")).await?;
    debug!(count = names.len(), "Listed narrative logs");
    Ok(Json(names))
}

/// Handler for GET /logs/:file.
async fn log_file_handler(
    State(state): State<AppState>,
    UrlPath(file): UrlPath<String>,
) -> Result<impl IntoResponse, ApiErrorResponse> {
    let file = checked_name(&file)?;
    let bytes = read_file(&state.logs_dir().join(file)).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        bytes,
    ))
}

/// Handler for GET /reports.
async fn list_report_folders_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiErrorResponse> {
    Ok(Json(list_names(state.reports_dir(), true, None).await?))
}

/// Handler for GET /reports/:folder.
///
/// Each PDF is paired with the run's narrative log, which shares the folder's name.
async fn list_reports_handler(
    State(state): State<AppState>,
    UrlPath(folder): UrlPath<String>,
) -> Result<Json<Vec<ReportEntry>>, ApiErrorResponse> {
    let folder = checked_name(&folder)?;
    let dir = state.reports_dir().join(folder);
    if !dir.is_dir() {
        return Err(ApiErrorResponse::not_found(folder));
    }

    let log_name = format!("{}.txt", folder);
    let log = state
        .logs_dir()
        .join(&log_name)
        .is_file()
        .then_some(log_name);

    let entries = list_names(&dir, false, Some("pdf"))
        .await?
        .into_iter()
        .map(|file| ReportEntry {
            file,
            log: log.clone(),
        })
        .collect();

    Ok(Json(entries))
}

/// Handler for GET /reports/:folder/:file.
async fn report_file_handler(
    State(state): State<AppState>,
    UrlPath((folder, file)): UrlPath<(String, String)>,
) -> Result<impl IntoResponse, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let folder = checked_name(&folder)?;
    let file = checked_name(&file)?;

    let bytes = read_file(&state.reports_dir().join(folder).join(file)).await?;
    info!(
        correlation_id = %correlation_id,
        folder,
        file,
        bytes = bytes.len(),
        "Serving report"
    );

    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes))
}
