use crate::errors::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// On-time/late split of the payment history as judged by the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHistorySummary {
    pub on_time: i64,
    pub late: i64,
}

/// Structured advice object returned by the summarization collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAdvice {
    pub credit_score: i64,
    pub credit_utilization: f64,
    pub payment_history: PaymentHistorySummary,
    pub avg_account_age: f64,
    #[serde(default)]
    pub account_types: HashMap<String, i64>,
    pub negative_items: i64,
    pub detailed_analysis: String,
    pub improvement_advice: String,
    pub action_steps: Vec<String>,
    pub negative_item_plans: Vec<String>,
    pub roadmap_90_days: Vec<String>,
    pub approval_advice: String,
    pub faq: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

const ADVISOR_SYSTEM_PROMPT: &str = "You are a world-class financial analyst specializing in credit reports. \
Analyze the given credit report and provide a detailed summary. \
In your output, ensure the following: \
1. Give a concise executive summary of the person's credit health and risks. \
2. List at least five highly actionable, personalized steps to improve their credit, referencing specific numbers from the report. \
3. For each negative item or risk, provide a clear explanation and a step-by-step action plan to resolve it (with links to reputable resources if possible). \
4. Provide a 90-day improvement roadmap with monthly milestones. \
5. Offer tailored advice for maximizing approval odds for loans, credit cards, or mortgages, based on their profile. \
6. Include a myth-busting FAQ section about credit scores and reports. \
7. Make the advice practical, detailed, and worth at least $99—do not be generic. \
8. Use clear, confident, and encouraging language.";

/// Client for the external report-summarization service (OpenAI-compatible
/// chat completions with a strict JSON response schema).
pub struct AdvisorService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AdvisorService {
    /// Creates a new `AdvisorService`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the completions API.
    /// * `api_key` - The API key for authentication.
    /// * `model` - The model identifier to request.
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create advisor client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Sends the report text for analysis and parses the structured advice.
    ///
    /// All failure shapes (transport, non-success status, missing choices,
    /// malformed JSON content) surface as `AppError::ExternalApiError`; the
    /// caller decides whether failure degrades the response.
    pub async fn analyze_report(&self, report_text: &str) -> Result<CreditAdvice, AppError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::info!(
            "Requesting credit advice for report of {} chars",
            report_text.len()
        );
        // Redact key from logs to prevent credential exposure
        tracing::debug!("Advisor URL: {} (authorization: [REDACTED])", url);

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": ADVISOR_SYSTEM_PROMPT},
                {
                    "role": "user",
                    "content": format!("Analyze the following credit report:\n\n{}", report_text),
                }
            ],
            "response_format": advice_response_format(),
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Advisor request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Advisor returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Advisor returned status {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse advisor response: {}", e))
        })?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| {
                AppError::ExternalApiError("Advisor response carried no choices".to_string())
            })?;

        let advice: CreditAdvice = serde_json::from_str(content).map_err(|e| {
            AppError::ExternalApiError(format!("Advisor returned malformed analysis: {}", e))
        })?;

        tracing::info!("Advisor analysis received ({} action steps)", advice.action_steps.len());
        Ok(advice)
    }
}

/// Strict JSON schema the advisor must answer with.
fn advice_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "credit_report_analysis",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "credit_score": {"type": "integer"},
                    "credit_utilization": {"type": "number"},
                    "payment_history": {
                        "type": "object",
                        "properties": {
                            "on_time": {"type": "integer"},
                            "late": {"type": "integer"}
                        },
                        "required": ["on_time", "late"],
                        "additionalProperties": false
                    },
                    "avg_account_age": {"type": "number"},
                    "account_types": {
                        "type": "object",
                        "additionalProperties": {"type": "integer"}
                    },
                    "negative_items": {"type": "integer"},
                    "detailed_analysis": {"type": "string"},
                    "improvement_advice": {"type": "string"},
                    "action_steps": {"type": "array", "items": {"type": "string"}},
                    "negative_item_plans": {"type": "array", "items": {"type": "string"}},
                    "roadmap_90_days": {"type": "array", "items": {"type": "string"}},
                    "approval_advice": {"type": "string"},
                    "faq": {"type": "array", "items": {"type": "string"}}
                },
                "required": [
                    "credit_score", "credit_utilization", "payment_history",
                    "avg_account_age", "negative_items", "detailed_analysis",
                    "improvement_advice", "action_steps", "negative_item_plans",
                    "roadmap_90_days", "approval_advice", "faq"
                ],
                "additionalProperties": false
            }
        }
    })
}
