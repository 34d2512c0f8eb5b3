//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::error::ProfilerError;
use crate::pipeline::{ComparisonSide, SuppliedRepository, UserActivity};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Map a pipeline error to a status and a public message
fn error_response(err: ProfilerError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if err.is_client_error() {
        tracing::debug!("Request rejected: {}", err);
    } else {
        tracing::error!("Request failed: {}", err);
    }
    (status, Json(ErrorResponse::new(err.public_message())))
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Malformed request body: {}", rejection);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("Invalid request body")),
    )
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub github_token: bool,
    pub summarizer_key: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        github_token: state.github_token,
        summarizer_key: state.summarizer_key,
    })
}

/// Request naming a single user
#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

/// Summary response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Fetch a profile with README- and commit-enriched repositories
pub async fn github_profile(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<Json<UserActivity>, ApiError> {
    let Json(req) = body.map_err(bad_request)?;

    state
        .pipeline
        .collect(&req.username)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Summarize a user by name, fetching everything server-side
pub async fn summary(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(req) = body.map_err(bad_request)?;

    let summary = state
        .pipeline
        .summarize_user(&req.username)
        .await
        .map_err(error_response)?;

    Ok(Json(SummaryResponse { summary }))
}

/// Analyze request: repositories already fetched by the caller
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub username: String,
    pub repos: Option<Vec<SuppliedRepository>>,
}

/// Summarize caller-supplied repositories
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(req) = body.map_err(bad_request)?;
    let repos = req
        .repos
        .ok_or_else(|| error_response(ProfilerError::validation("Missing repos")))?;
    tracing::info!("Analyze request for {} ({} repos)", req.username.trim(), repos.len());

    let summary = state
        .pipeline
        .summarize_repos(&req.username, repos)
        .await
        .map_err(error_response)?;

    Ok(Json(SummaryResponse { summary }))
}

/// Compare request
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub second: String,
}

/// One side of a comparison response
#[derive(Debug, Serialize, Deserialize)]
pub struct SideResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ComparisonSide> for SideResponse {
    fn from(side: ComparisonSide) -> Self {
        match side.outcome {
            Ok(summary) => Self {
                username: side.username,
                summary: Some(summary),
                error: None,
            },
            Err(e) => Self {
                username: side.username,
                summary: None,
                error: Some(e.public_message()),
            },
        }
    }
}

/// Compare response
#[derive(Debug, Serialize, Deserialize)]
pub struct CompareResponse {
    pub first: SideResponse,
    pub second: SideResponse,
}

/// Summarize two users side by side
pub async fn compare(
    State(state): State<AppState>,
    body: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
    let Json(req) = body.map_err(bad_request)?;
    if req.first.trim().is_empty() || req.second.trim().is_empty() {
        return Err(error_response(ProfilerError::validation(
            "Two usernames are required",
        )));
    }

    let comparison = state.pipeline.compare_users(&req.first, &req.second).await;

    Ok(Json(CompareResponse {
        first: comparison.first.into(),
        second: comparison.second.into(),
    }))
}

/// Notes list response
#[derive(Debug, Serialize, Deserialize)]
pub struct NotesResponse {
    pub notes: Vec<String>,
}

/// List saved notes; an unreadable store reads as empty
pub async fn list_notes(State(state): State<AppState>) -> Json<NotesResponse> {
    let notes = match state.notes.list().await {
        Ok(notes) => notes,
        Err(e) => {
            tracing::error!("Error reading notes: {}", e);
            Vec::new()
        }
    };
    Json(NotesResponse { notes })
}

/// Add note request
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: Option<String>,
}

/// Add note response
#[derive(Debug, Serialize, Deserialize)]
pub struct NoteSaved {
    pub success: bool,
}

/// Append a note
pub async fn add_note(
    State(state): State<AppState>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let note = match body {
        Ok(Json(NoteRequest { note: Some(note) })) if !note.is_empty() => note,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid note")),
            )
                .into_response()
        }
    };

    match state.notes.append(&note).await {
        Ok(()) => Json(NoteSaved { success: true }).into_response(),
        Err(e) => {
            tracing::error!("Error saving note: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(NoteSaved { success: false }),
            )
                .into_response()
        }
    }
}
