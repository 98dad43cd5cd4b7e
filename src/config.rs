use crate::features::FeatureDefaults;
use serde::Deserialize;

/// Assumed monthly rent when only a report document is available.
/// Kept as configuration until product decides on a real data source.
pub const DEFAULT_ASSUMED_MONTHLY_RENT: f64 = 20_000.0;
/// Assumed active subscription count for the document-only path.
pub const DEFAULT_ASSUMED_SUBSCRIPTION_COUNT: f64 = 2.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub model_weights_path: String,
    pub scaler_params_path: String,
    pub advisor_api_key: Option<String>, // Optional: absence disables advice
    pub advisor_base_url: String,
    pub advisor_model: String,
    pub assumed_monthly_rent: f64,
    pub assumed_subscription_count: f64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_weights_path: std::env::var("MODEL_WEIGHTS_PATH")
                .unwrap_or_else(|_| "credit_score_model.json".to_string()),
            scaler_params_path: std::env::var("SCALER_PARAMS_PATH")
                .unwrap_or_else(|_| "scaler.json".to_string()),
            advisor_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            advisor_base_url: std::env::var("ADVISOR_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string())
                .parse::<url::Url>()
                .map_err(|e| anyhow::anyhow!("ADVISOR_BASE_URL is not a valid URL: {}", e))
                .and_then(|url| {
                    if url.scheme() != "http" && url.scheme() != "https" {
                        anyhow::bail!("ADVISOR_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.to_string().trim_end_matches('/').to_string())
                })?,
            advisor_model: std::env::var("ADVISOR_MODEL")
                .unwrap_or_else(|_| "gpt-4o-2024-08-06".to_string()),
            assumed_monthly_rent: std::env::var("ASSUMED_MONTHLY_RENT")
                .map_or(Ok(DEFAULT_ASSUMED_MONTHLY_RENT), |v| {
                    v.parse().map_err(|_| {
                        anyhow::anyhow!("ASSUMED_MONTHLY_RENT must be a valid number")
                    })
                })?,
            assumed_subscription_count: std::env::var("ASSUMED_SUBSCRIPTION_COUNT")
                .map_or(Ok(DEFAULT_ASSUMED_SUBSCRIPTION_COUNT), |v| {
                    v.parse().map_err(|_| {
                        anyhow::anyhow!("ASSUMED_SUBSCRIPTION_COUNT must be a valid number")
                    })
                })?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Model weights path: {}", config.model_weights_path);
        tracing::debug!("Scaler params path: {}", config.scaler_params_path);
        if config.advisor_api_key.is_some() {
            tracing::info!("Advisor configured: {}", config.advisor_base_url);
        } else {
            tracing::info!("No advisor API key set; advice generation disabled");
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Placeholder figures substituted for fields a report alone does not carry.
    pub fn feature_defaults(&self) -> FeatureDefaults {
        FeatureDefaults {
            assumed_monthly_rent: self.assumed_monthly_rent,
            assumed_subscription_count: self.assumed_subscription_count,
        }
    }
}
