use axum::{
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_credit_api::circuit_breaker;
use rust_credit_api::config::Config;
use rust_credit_api::document::PlainTextConverter;
use rust_credit_api::extraction::FieldExtractor;
use rust_credit_api::handlers;
use rust_credit_api::scoring::{NormalizationParameters, Normalizer, ScoringModel};
use rust_credit_api::services::AdvisorService;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The scoring weights and normalization artifacts (degraded modes logged).
/// - The analysis cache and advisor client.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_credit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Load the scoring weights. Absence is a valid degraded state: the
    // scoring endpoints answer 503 until a weights artifact is provided.
    let model = match ScoringModel::load(Path::new(&config.model_weights_path)) {
        Ok(model) => {
            tracing::info!("Scoring model loaded from {}", config.model_weights_path);
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::warn!("Scoring disabled: {:#}", e);
            None
        }
    };

    // Load the fitted normalization parameters; without them the transform
    // is the identity.
    let normalizer = match NormalizationParameters::load(Path::new(&config.scaler_params_path)) {
        Ok(params) => {
            tracing::info!(
                "Normalization parameters loaded from {}",
                config.scaler_params_path
            );
            Normalizer::fitted(params)
        }
        Err(e) => {
            tracing::warn!("Normalization degraded to identity: {:#}", e);
            Normalizer::identity()
        }
    };

    // Initialize the advisor client when a key is configured
    let advisor = match config.advisor_api_key.clone() {
        Some(api_key) => {
            match AdvisorService::new(
                config.advisor_base_url.clone(),
                api_key,
                config.advisor_model.clone(),
            ) {
                Ok(client) => {
                    tracing::info!("✓ Advisor client initialized: {}", config.advisor_base_url);
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!("Failed to initialize advisor client: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    // Create analysis response cache (1 hour TTL, 10k max entries)
    // Caches analyses by document digest so re-uploads skip the advisor call
    let analysis_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(10_000)
        .build();
    tracing::info!("Analysis cache initialized (1h TTL, 10k capacity)");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        extractor: FieldExtractor::new(),
        model,
        normalizer: Arc::new(normalizer),
        advisor,
        advisor_breaker: circuit_breaker::create_advisor_circuit_breaker(),
        converter: Arc::new(PlainTextConverter),
        analysis_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/predict", post(handlers::predict))
        .route("/api/v1/analyze", post(handlers::analyze))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 10MB max payload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20 (prevents DDoS)
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
