//! Analysis endpoint
//!
//! POST /process_text_audio (multipart/form-data)
//!
//! Fields, all optional:
//! - `text_input`: free text, any language
//! - `audio_file`: audio clip; the file name's extension picks the decoder
//! - `image_file`: still image for the Visual modality
//!
//! Unknown fields are ignored. An unreadable body, a non-multipart request
//! or non-UTF-8 text is a 400; everything else yields a complete 200 record.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use emofuse_common::{EmotionLabel, Modality, SignalResult};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::orchestrator::{AnalysisReport, AnalysisRequest, RequestLifecycle, VisualSource};
use crate::types::{AudioUpload, Frame};
use crate::AppState;

pub const TEXT_FIELD: &str = "text_input";
pub const AUDIO_FIELD: &str = "audio_file";
pub const IMAGE_FIELD: &str = "image_file";

/// POST /process_text_audio response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: Uuid,
    pub final_emotion: EmotionLabel,
    pub visual_emotion: EmotionLabel,
    pub speech_emotion: EmotionLabel,
    pub text_emotion: EmotionLabel,
    pub translated_text: String,
    pub lang_status: String,
    pub visual_source: VisualSource,
    /// Per-modality results with diagnostics, Visual/Speech/Text
    pub signals: [SignalResult; 3],
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(report: AnalysisReport) -> Self {
        let outcome = report.outcome;
        Self {
            request_id: report.request_id,
            final_emotion: outcome.final_label.clone(),
            visual_emotion: outcome.signal(Modality::Visual).label.clone(),
            speech_emotion: outcome.signal(Modality::Speech).label.clone(),
            text_emotion: outcome.signal(Modality::Text).label.clone(),
            translated_text: report.translated_text,
            lang_status: report.lang_status,
            visual_source: report.visual_source,
            signals: outcome.per_modality,
        }
    }
}

pub async fn process_text_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let mut lifecycle = RequestLifecycle::received();

    let parsed = match multipart {
        Ok(multipart) => read_request(multipart).await,
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    };
    let request = match parsed {
        Ok(request) => request,
        Err(e) => {
            lifecycle.fail(&e.to_string());
            return Err(e);
        }
    };

    let report = state
        .orchestrator
        .run(lifecycle, request)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(AnalyzeResponse::from(report)))
}

async fn read_request(mut multipart: Multipart) -> ApiResult<AnalysisRequest> {
    let mut request = AnalysisRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Unreadable multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            TEXT_FIELD => {
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Unreadable field '{}': {}", TEXT_FIELD, e))
                })?;
                let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    ApiError::BadRequest(format!("Field '{}' is not valid UTF-8", TEXT_FIELD))
                })?;
                request.text = Some(text);
            }
            AUDIO_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Unreadable field '{}': {}", AUDIO_FIELD, e))
                })?;
                // Browsers send an empty part with no file name for an untouched file input
                if !file_name.is_empty() && !bytes.is_empty() {
                    request.audio = Some(AudioUpload::new(file_name, bytes.to_vec()));
                }
            }
            IMAGE_FIELD => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Unreadable field '{}': {}", IMAGE_FIELD, e))
                })?;
                if !bytes.is_empty() {
                    request.image = Some(Frame::new(bytes.to_vec(), content_type));
                }
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(request)
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/process_text_audio", post(process_text_audio))
}
