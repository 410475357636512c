//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{get_user_id, ApiJson, AppError, AppState};
use savevibe_core::models::{NewSavingsGoal, SavingsGoal};
use savevibe_core::GoalStore;

#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub amount: f64,
}

/// A goal with its progress toward the target
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub progress_percent: f64,
    pub reached: bool,
}

impl From<SavingsGoal> for GoalResponse {
    fn from(goal: SavingsGoal) -> Self {
        Self {
            progress_percent: goal.progress_percent(),
            reached: goal.is_reached(),
            goal,
        }
    }
}

/// Fetch a goal owned by the acting user
fn owned_goal(state: &AppState, user_id: i64, id: i64) -> Result<SavingsGoal, AppError> {
    state
        .store
        .get_goal(id)?
        .filter(|goal| goal.user_id == user_id)
        .ok_or_else(|| AppError::not_found("Savings goal not found"))
}

/// GET /api/goals - List savings goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<GoalResponse>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let goals = state.store.list_goals(user_id)?;
    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

/// POST /api/goals - Create a savings goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<NewSavingsGoal>,
) -> Result<Json<GoalResponse>, AppError> {
    let user_id = get_user_id(&headers)?;
    Ok(Json(state.store.create_goal(user_id, &body)?.into()))
}

/// GET /api/goals/:id - Get a single goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<GoalResponse>, AppError> {
    let user_id = get_user_id(&headers)?;
    Ok(Json(owned_goal(&state, user_id, id)?.into()))
}

/// POST /api/goals/:id/contribute - Add money to a goal
pub async fn contribute_to_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<ContributionRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let user_id = get_user_id(&headers)?;
    owned_goal(&state, user_id, id)?;
    Ok(Json(state.store.add_to_goal(id, body.amount)?.into()))
}
