//! Authentication-related handlers

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{get_user_id, AppError, AppState, AUTHORIZATION_HEADER};

/// Response for the /api/me endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// The acting user's ID
    pub user_id: i64,
    /// How the request was authenticated
    pub auth_method: String,
}

/// GET /api/me - Get the acting user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, AppError> {
    let user_id = get_user_id(&headers)?;

    let auth_method = if !state.config.require_auth {
        "none"
    } else if headers.contains_key(AUTHORIZATION_HEADER) {
        "api_key"
    } else {
        "unknown"
    };

    Ok(Json(MeResponse {
        user_id,
        auth_method: auth_method.to_string(),
    }))
}
