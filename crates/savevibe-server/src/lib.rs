//! SaveVibe Web Server
//!
//! Axum-based REST API for the SaveVibe personal finance tracker.
//!
//! Security features:
//! - API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Security response headers
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use savevibe_core::{
    AlertThresholds, GamificationService, SpendingAlertService, SpendingClassifier, Store,
};

mod handlers;

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "SAVEVIBE_API_KEYS";

/// Header naming the acting user
pub const USER_HEADER: &str = "x-savevibe-user";

/// User assumed when no user header is sent
pub const DEFAULT_USER_ID: i64 = 1;

/// Authorization header for API key auth
pub(crate) const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Accepted bearer keys, sent as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
    /// Percent-of-budget levels for `/api/alerts`
    pub alert_thresholds: AlertThresholds,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
            alert_thresholds: AlertThresholds::default(),
        }
    }
}

impl ServerConfig {
    /// Read API keys from `SAVEVIBE_API_KEYS`
    pub fn api_keys_from_env() -> Vec<String> {
        std::env::var(API_KEYS_ENV)
            .map(|raw| parse_api_keys(&raw))
            .unwrap_or_default()
    }
}

/// Split a comma-separated key list, dropping blanks
pub fn parse_api_keys(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
    pub classifier: SpendingClassifier,
    pub alerts: SpendingAlertService,
    pub gamification: GamificationService,
}

/// Authentication middleware - validates bearer API keys
///
/// Keys are compared in constant time.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        info!(user = "api-key", path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        // Only same-length keys are compared; ct_eq requires equal lengths
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Resolve the acting user from the `x-savevibe-user` header
pub fn get_user_id(headers: &HeaderMap) -> Result<i64, AppError> {
    match headers.get(USER_HEADER) {
        None => Ok(DEFAULT_USER_ID),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::bad_request("x-savevibe-user must be a positive integer")),
    }
}

/// JSON body extractor that reports malformed or mistyped bodies as 400
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(&rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Create the application router
pub fn create_router(
    store: Arc<dyn Store>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    create_router_with_classifier(store, static_dir, config, SpendingClassifier::new())
}

/// Create the application router with a specific classifier (for testing)
pub fn create_router_with_classifier(
    store: Arc<dyn Store>,
    static_dir: Option<&str>,
    config: ServerConfig,
    classifier: SpendingClassifier,
) -> Router {
    info!(forecaster = classifier.forecaster_name(), "Spending classifier ready");

    let state = Arc::new(AppState {
        store,
        config: config.clone(),
        classifier,
        alerts: SpendingAlertService::with_thresholds(config.alert_thresholds),
        gamification: GamificationService::new(),
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Insights
        .route(
            "/ai/spending-classification/:month/:year",
            get(handlers::get_spending_classification),
        )
        .route("/alerts/:month/:year", get(handlers::get_budget_alerts))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/:id", get(handlers::get_transaction))
        // Budgets
        .route("/budgets", put(handlers::set_budget))
        .route("/budgets/:month/:year", get(handlers::list_budgets))
        // Savings goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/goals/:id", get(handlers::get_goal))
        .route("/goals/:id/contribute", post(handlers::contribute_to_goal))
        // Challenges and badges
        .route(
            "/challenges",
            get(handlers::list_challenges).post(handlers::start_challenge),
        )
        .route(
            "/challenges/:id/contribute",
            post(handlers::contribute_to_challenge),
        )
        .route("/badges", get(handlers::list_badges));

    // Build CORS layer
    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static(USER_HEADER),
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with default (authenticated) configuration
pub async fn serve(
    store: Arc<dyn Store>,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    let config = ServerConfig {
        api_keys: ServerConfig::api_keys_from_env(),
        ..Default::default()
    };
    serve_with_config(store, host, port, static_dir, config).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    store: Arc<dyn Store>,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!(
            "⚠️  Authentication required but no API keys configured (set {})",
            API_KEYS_ENV
        );
    }

    let app = create_router(store, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes surface as-is; anything else stays server-side
        match err.downcast_ref::<savevibe_core::Error>() {
            Some(savevibe_core::Error::InvalidData(msg)) => Self::bad_request(msg),
            Some(savevibe_core::Error::NotFound(msg)) => {
                Self::not_found(&format!("Not found: {}", msg))
            }
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(err),
            },
        }
    }
}
