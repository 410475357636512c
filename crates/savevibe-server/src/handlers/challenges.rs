//! Challenge and badge handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use super::goals::ContributionRequest;
use crate::{get_user_id, ApiJson, AppError, AppState};
use savevibe_core::models::{Badge, BadgeKind, Challenge, NewChallenge};
use savevibe_core::{ChallengeStore, ContributionOutcome};

/// A held badge with its display title
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub badge: BadgeKind,
    pub title: &'static str,
    pub unlocked_at: chrono::DateTime<chrono::Utc>,
}

impl From<Badge> for BadgeResponse {
    fn from(badge: Badge) -> Self {
        Self {
            badge: badge.kind,
            title: badge.kind.title(),
            unlocked_at: badge.unlocked_at,
        }
    }
}

/// GET /api/challenges - List challenges
pub async fn list_challenges(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Challenge>>, AppError> {
    let user_id = get_user_id(&headers)?;
    Ok(Json(state.store.list_challenges(user_id)?))
}

/// POST /api/challenges - Start a challenge
pub async fn start_challenge(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<NewChallenge>,
) -> Result<Json<Challenge>, AppError> {
    let user_id = get_user_id(&headers)?;
    let challenge = state
        .gamification
        .start_challenge(state.store.as_ref(), user_id, &body)?;
    Ok(Json(challenge))
}

/// POST /api/challenges/:id/contribute - Save toward a challenge
pub async fn contribute_to_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<ContributionRequest>,
) -> Result<Json<ContributionOutcome>, AppError> {
    let user_id = get_user_id(&headers)?;

    let owned = state
        .store
        .get_challenge(id)?
        .is_some_and(|challenge| challenge.user_id == user_id);
    if !owned {
        return Err(AppError::not_found("Challenge not found"));
    }

    let outcome = state
        .gamification
        .contribute(state.store.as_ref(), id, body.amount)?;
    Ok(Json(outcome))
}

/// GET /api/badges - Badges held by the acting user
pub async fn list_badges(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BadgeResponse>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let badges = state.store.list_badges(user_id)?;
    Ok(Json(badges.into_iter().map(BadgeResponse::from).collect()))
}
