use crate::circuit_breaker::AdvisorCircuitBreaker;
use crate::config::Config;
use crate::document::DocumentConverter;
use crate::errors::{AppError, ResultExt};
use crate::extraction::FieldExtractor;
use crate::features;
use crate::models::{AnalyzeResponse, PredictResponse, ResponseMetadata};
use crate::scoring::{Normalizer, ScoringModel};
use crate::services::AdvisorService;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use failsafe::futures::CircuitBreaker;
use moka::future::Cache;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Compiled field-pattern cascades.
    pub extractor: FieldExtractor,
    /// Scoring network weights; `None` leaves the scoring path down.
    pub model: Option<Arc<ScoringModel>>,
    /// Fitted feature normalizer, or the identity when no artifact was loaded.
    pub normalizer: Arc<Normalizer>,
    /// Client for the summarization collaborator (optional).
    pub advisor: Option<Arc<AdvisorService>>,
    /// Breaker shared across advisor calls so a flapping collaborator fails fast.
    pub advisor_breaker: AdvisorCircuitBreaker,
    /// Converter at the document-to-text boundary.
    pub converter: Arc<dyn DocumentConverter>,
    /// Analysis response cache keyed by document SHA-256 digest.
    /// Value: serialized `AnalyzeResponse`.
    pub analysis_cache: Cache<String, String>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-credit-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/predict
///
/// Scores caller-supplied raw feature values. Feature names missing from the
/// payload contribute 0; values are passed to normalization unvalidated.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - Mapping of feature name to value.
///
/// # Returns
///
/// * `Result<Json<PredictResponse>, AppError>` - The predicted score or an error.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<HashMap<String, f64>>,
) -> Result<Json<PredictResponse>, AppError> {
    tracing::info!("POST /predict - {} feature(s) supplied", payload.len());

    let model = require_model(&state)?;
    let raw = features::from_raw_map(&payload);
    let normalized = state.normalizer.transform(&raw);
    let score = round_score(model.forward(&normalized));

    Ok(Json(PredictResponse {
        predicted_score: score,
    }))
}

/// POST /api/v1/analyze
///
/// Full document analysis: stage the upload, convert to text, extract
/// fields, score with placeholder defaults for rent and subscriptions, and
/// request advice from the summarization collaborator. Advisor failure
/// degrades to an `advice_error` field; the score and extracted fields are
/// still returned.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `multipart` - Multipart body carrying the document under the field
///   name `document` (`pdf` accepted as an alias).
///
/// # Returns
///
/// * `Result<Json<AnalyzeResponse>, AppError>` - The analysis or an error.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    // Step 1: Locate the uploaded document
    let mut document_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart payload: {}", e)))?
    {
        if matches!(field.name(), Some("document") | Some("pdf")) {
            document_bytes = Some(field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read uploaded document: {}", e))
            })?);
            break;
        }
    }
    let document_bytes =
        document_bytes.ok_or_else(|| AppError::BadRequest("No document uploaded.".to_string()))?;

    tracing::info!("Analyzing uploaded document ({} bytes)", document_bytes.len());

    // Step 2: Serve repeated uploads of the same bytes from cache
    let digest = hex::encode(Sha256::digest(&document_bytes));
    if let Some(cached) = state.analysis_cache.get(&digest).await {
        tracing::info!("Analysis cache hit for digest {}", &digest[..12]);
        let response: AnalyzeResponse = serde_json::from_str(&cached)
            .map_err(|e| AppError::InternalError(format!("Corrupt cached analysis: {}", e)))?;
        return Ok(Json(response));
    }

    // Step 3: Stage to a per-request unique path. A fixed shared name would
    // collide under concurrent uploads.
    let staged = std::env::temp_dir().join(format!("credit-report-{}.txt", Uuid::new_v4()));
    tokio::fs::write(&staged, &document_bytes)
        .await
        .context("failed to stage uploaded document")?;

    let text_result = state.converter.extract_text(&staged);
    if let Err(e) = tokio::fs::remove_file(&staged).await {
        tracing::warn!("Failed to remove staged document {}: {}", staged.display(), e);
    }
    let text = text_result.context("failed to convert staged document")?;

    // Step 4: Extract fields and score
    let fields = state.extractor.extract(&text);
    let model = require_model(&state)?;
    let raw = features::from_extracted(&fields, &state.config.feature_defaults());
    let normalized = state.normalizer.transform(&raw);
    let model_score = round_score(model.forward(&normalized));

    tracing::info!("Model score {} for digest {}", model_score, &digest[..12]);

    // Step 5: Ask the advisor; its failure never aborts the response
    let (advice, advice_error) = match state.advisor.as_ref() {
        Some(advisor) => {
            match state
                .advisor_breaker
                .call(advisor.analyze_report(&text))
                .await
            {
                Ok(advice) => (Some(advice), None),
                Err(failsafe::Error::Inner(e)) => {
                    tracing::warn!("Advisor call failed: {}", e);
                    (None, Some(e.to_string()))
                }
                Err(failsafe::Error::Rejected) => {
                    tracing::warn!("Advisor circuit open; skipping call");
                    (None, Some("Advisor temporarily unavailable".to_string()))
                }
            }
        }
        None => (None, None),
    };

    let response = AnalyzeResponse {
        model_score,
        extracted_features: fields,
        advice,
        advice_error,
        metadata: ResponseMetadata {
            normalized: state.normalizer.is_fitted(),
            advisor_enabled: state.advisor.is_some(),
            document_sha256: digest.clone(),
            timestamp: Utc::now().to_rfc3339(),
        },
    };

    // Step 6: Cache the serialized response. Responses degraded by a
    // transient advisor failure are not cached, so a later upload retries.
    if response.advice_error.is_none() {
        match serde_json::to_string(&response) {
            Ok(serialized) => state.analysis_cache.insert(digest, serialized).await,
            Err(e) => tracing::warn!("Failed to serialize analysis for caching: {}", e),
        }
    }

    Ok(Json(response))
}

fn require_model(state: &AppState) -> Result<&Arc<ScoringModel>, AppError> {
    state.model.as_ref().ok_or_else(|| {
        AppError::ScoringUnavailable("weights artifact was not loaded at startup".to_string())
    })
}

fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
