//! HTTP routes.

use crate::error::{ApiError, ApiResult};
use crate::extract::{self, ExtractError};
use crate::intake::{self, IntakeError};
use crate::render::markdown_to_html;
use crate::session::{self, session_cookie};
use crate::threads::{ThreadsClient, ThreadsPost};
use crate::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::FormRejection,
        DefaultBodyLimit, Form, Multipart, Query, State,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Redirect},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Where the OAuth callback sends the browser once the token is stored.
pub const THREADS_REVIEW_PATH: &str = "/threads-review";

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route(THREADS_REVIEW_PATH, get(threads_review))
        .route("/threads/login", get(threads_login))
        .route("/threads/callback", get(threads_callback))
        .route("/threads/search", post(threads_search))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Document analysis
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
}

/// Upload a document, analyze it and return the report as HTML.
async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    // Not a multipart body at all, so there is no file part to find.
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Multipart rejected: {}", rejection.body_text());
        IntakeError::FileRequired
    })?;
    let document = intake::read_upload(&mut multipart).await?;

    info!(
        "Received file: {} ({} bytes, sha256={})",
        document.filename,
        document.data.len(),
        fingerprint(&document.data)
    );

    // Parsing is CPU-bound; a panicking parser counts as an unreadable document.
    let text = tokio::task::spawn_blocking(move || extract::extract_text(&document))
        .await
        .map_err(|e| ExtractError::ReadFailed(format!("document parser aborted: {}", e)))??;

    let analysis = state.analyzer.analyze(&text).await?;

    Ok(Json(AnalyzeResponse {
        result: markdown_to_html(&analysis),
    }))
}

fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Threads
// ============================================================================

fn threads_client(state: &AppState) -> ApiResult<&Arc<ThreadsClient>> {
    state.threads.as_ref().ok_or(ApiError::ThreadsDisabled)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewStatus {
    pub authenticated: bool,
}

/// Whether the caller's session holds a Threads token.
async fn threads_review(State(state): State<AppState>, headers: HeaderMap) -> Json<ReviewStatus> {
    Json(ReviewStatus {
        authenticated: state.sessions.token_from_headers(&headers).is_some(),
    })
}

/// Redirect to the Threads authorization page.
async fn threads_login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let url = threads_client(&state)?.authorize_url()?;
    Ok(Redirect::to(&url))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

/// OAuth callback: trade the code for a token and keep it in the session.
async fn threads_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<impl IntoResponse> {
    let client = threads_client(&state)?;
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingAuthCode)?;

    let token = client.exchange_code(&code).await?;
    let existing = session::session_id_from_headers(&headers);
    let session_id = state.sessions.store_token(existing.as_deref(), token);

    Ok((
        [(header::SET_COOKIE, session_cookie(&session_id))],
        Redirect::to(THREADS_REVIEW_PATH),
    ))
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default)]
    keyword: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<ThreadsPost>,
}

/// Keyword search on behalf of the session's Threads user.
async fn threads_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SearchForm>, FormRejection>,
) -> ApiResult<Json<SearchResults>> {
    let Form(form) = form.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
    let client = threads_client(&state)?;
    let token = state
        .sessions
        .token_from_headers(&headers)
        .ok_or(ApiError::ThreadsUnauthenticated)?;

    let results = client.keyword_search(&token, &form.keyword).await?;
    Ok(Json(SearchResults { results }))
}
