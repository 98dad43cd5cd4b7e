use crate::extraction::ExtractedFields;
use crate::services::CreditAdvice;
use serde::{Deserialize, Serialize};

// ============ API Models ============

/// Response of the direct-prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted score, rounded to two decimals.
    pub predicted_score: f64,
}

/// Provenance attached to every analysis response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Whether fitted normalization parameters were applied (identity otherwise).
    pub normalized: bool,
    /// Whether the advisor collaborator is configured for this process.
    pub advisor_enabled: bool,
    /// SHA-256 of the uploaded document, also the analysis cache key.
    pub document_sha256: String,
    /// RFC 3339 timestamp of when the analysis was computed.
    pub timestamp: String,
}

/// Full response of the document-analysis endpoint.
///
/// `advice` and `advice_error` are mutually exclusive: a failed or disabled
/// advisor never aborts the response, it only leaves `advice` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub model_score: f64,
    pub extracted_features: ExtractedFields,
    pub advice: Option<CreditAdvice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice_error: Option<String>,
    pub metadata: ResponseMetadata,
}
