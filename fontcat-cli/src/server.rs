//! HTTP server for fontcat - the front desk of the font reading room (made by FontLab https://www.fontlab.com/)
//!
//! Visitors ask for a page of the catalogue, a single family's card, or the
//! stylesheet that lets their browser draw a preview. The catalogue itself is
//! loaded once before the doors open and is only ever read afterwards.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fontcat_core::catalog::{CatalogSet, CombinedFontRecord, LookupError};
use fontcat_core::css::{font_preview, generate_font_face_css, FontPreview};
use fontcat_core::search::{InitialFonts, SearchParams, SearchResponse, DEFAULT_LIMIT, DEFAULT_PAGE};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task;

/// Read-only catalog shared by every request.
pub type SharedCatalog = Arc<CatalogSet>;

/// Raw `/api/search` query string.
///
/// `page` and `limit` arrive as text so that junk like `?page=abc` falls back
/// to the defaults instead of rejecting the request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Free text matched against family, category and variants
    pub q: Option<String>,
    /// `variable` or `static`; anything else is ignored
    pub property: Option<String>,
    /// Exact category such as `serif` or `sans-serif`
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            page: parse_number(self.page.as_deref(), DEFAULT_PAGE),
            limit: parse_number(self.limit.as_deref(), DEFAULT_LIMIT),
            query: self.q,
            property: self.property,
            category: self.category,
        }
    }
}

fn parse_number(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Errors a handler can hand back to the client as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Internal(String),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound { .. } => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Font not found".to_string()),
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Bind to `bind` and serve until Ctrl-C.
pub async fn serve(bind: &str, catalog: SharedCatalog) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding HTTP server to {bind}"))?;
    let addr = listener.local_addr().context("reading bound address")?;
    tracing::info!(
        %addr,
        variable = catalog.variable_fonts().len(),
        statics = catalog.static_fonts().len(),
        "fontcat listening"
    );

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search_handler))
        .route("/api/fonts", get(list_handler))
        .route("/api/fonts/:id", get(detail_handler))
        .route("/api/fonts/:id/css", get(css_handler))
        .route("/api/fonts/:id/preview", get(preview_handler))
        .with_state(catalog)
}

async fn search_handler(
    State(catalog): State<SharedCatalog>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let params = query.into_params();

    let response = task::spawn_blocking(move || catalog.search(&params))
        .await
        .map_err(|e| ApiError::Internal(format!("task join error: {e}")))?;

    Ok(Json(response))
}

async fn list_handler(State(catalog): State<SharedCatalog>) -> Json<InitialFonts> {
    Json(catalog.initial_page())
}

async fn detail_handler(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<Json<CombinedFontRecord>, ApiError> {
    tracing::debug!(%id, "font detail");
    Ok(Json(catalog.lookup(&id)?))
}

async fn css_handler(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let font = catalog.lookup(&id)?;
    let css = generate_font_face_css(&font);
    Ok(([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css))
}

async fn preview_handler(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<Json<FontPreview>, ApiError> {
    let font = catalog.lookup(&id)?;
    Ok(Json(font_preview(&font)))
}
