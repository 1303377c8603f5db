//! Axum route handlers for the session API.
//!
//! Handlers only translate HTTP to pipeline calls: read the upload, lock the
//! session, run one stage, shape the response.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::extract::ExtractionReport;
use crate::errors::AppError;
use crate::models::brand::BrandProfile;
use crate::models::document::{Document, MediaKind};
use crate::models::segment::Segment;
use crate::models::variant::{SourceContent, Variant};
use crate::session::store::SessionSnapshot;
use crate::state::AppState;

/// Multipart field that carries the uploaded document.
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ManualBrandRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub brand: BrandProfile,
    pub extraction_error: Option<ExtractionReport>,
}

#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    /// Presentable segments, in extraction order.
    pub segments: Vec<Segment>,
    /// All extracted segments, including hidden sentinel-only ones.
    pub total: usize,
    pub extraction_error: Option<ExtractionReport>,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub source: SourceContent,
    pub extraction_error: Option<ExtractionReport>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonalizeRequest {
    /// The segment the source content already targets; it is skipped.
    #[serde(default)]
    pub targeted_segment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersonalizeResponse {
    pub variants: Vec<Variant>,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    pub instructions: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session = state.sessions.create().await;
    let session_id = session.lock().await.id;
    (StatusCode::CREATED, Json(SessionCreatedResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/brand
pub async fn handle_upload_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<BrandResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let document = read_document(multipart).await?;

    let mut session = session.lock().await;
    let ingested = state.pipeline.load_brand_guide(&mut session, &document).await?;

    Ok(Json(BrandResponse {
        brand: ingested.value,
        extraction_error: ingested.extraction_error,
    }))
}

/// POST /api/v1/sessions/:id/brand/manual
pub async fn handle_manual_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ManualBrandRequest>,
) -> Result<Json<BrandResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let brand = state
        .pipeline
        .enter_brand_text(&mut session, &request.text)
        .await?;

    Ok(Json(BrandResponse {
        brand,
        extraction_error: None,
    }))
}

/// POST /api/v1/sessions/:id/segments
///
/// Slow: one model call for the names plus one per segment.
pub async fn handle_upload_segments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SegmentsResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let document = read_document(multipart).await?;

    let mut session = session.lock().await;
    let ingested = state.pipeline.load_segments(&mut session, &document).await?;

    Ok(Json(SegmentsResponse {
        segments: ingested.value.presentable().into_iter().cloned().collect(),
        total: ingested.value.len(),
        extraction_error: ingested.extraction_error,
    }))
}

/// POST /api/v1/sessions/:id/content
pub async fn handle_upload_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ContentResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let document = read_document(multipart).await?;

    let mut session = session.lock().await;
    let ingested = state.pipeline.load_source_content(&mut session, &document)?;

    Ok(Json(ContentResponse {
        source: ingested.value,
        extraction_error: ingested.extraction_error,
    }))
}

/// POST /api/v1/sessions/:id/personalize
pub async fn handle_personalize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PersonalizeRequest>,
) -> Result<Json<PersonalizeResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let variants = state
        .pipeline
        .personalize(&mut session, request.targeted_segment.as_deref())
        .await?;

    Ok(Json(PersonalizeResponse { variants }))
}

/// POST /api/v1/sessions/:id/variants/:segment/revise
pub async fn handle_revise(
    State(state): State<AppState>,
    Path((id, segment)): Path<(Uuid, String)>,
    Json(request): Json<ReviseRequest>,
) -> Result<Json<Variant>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let variant = state
        .pipeline
        .revise(&mut session, &segment, &request.instructions)
        .await?;

    Ok(Json(variant))
}

/// GET /api/v1/sessions/:id/variants/:segment/download
///
/// Plain-text attachment named `<segment>_content.txt` or `<segment>_revised.txt`.
pub async fn handle_download(
    State(state): State<AppState>,
    Path((id, segment)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    let variant = session
        .variant(&segment)
        .ok_or_else(|| AppError::NotFound(format!("No content generated for '{segment}'")))?;

    let disposition = format!("attachment; filename=\"{}\"", variant.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        variant.text.clone(),
    )
        .into_response())
}

/// Pulls the `file` part out of a multipart body.
async fn read_document(mut multipart: Multipart) -> Result<Document, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let kind = MediaKind::detect(field.content_type(), field.file_name());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        return Ok(Document::new(kind, bytes));
    }

    Err(AppError::Validation(format!(
        "Multipart body must contain a '{FILE_FIELD}' field"
    )))
}
