//! Budget allocation handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::{get_user_id, ApiJson, AppError, AppState};
use savevibe_core::models::{BudgetAllocation, NewBudgetAllocation};
use savevibe_core::{BudgetStore, MonthPeriod};

/// GET /api/budgets/:month/:year - Allocations for a month
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Path((month, year)): Path<(u32, i32)>,
    headers: HeaderMap,
) -> Result<Json<Vec<BudgetAllocation>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let period = MonthPeriod::new(month, year)?;
    Ok(Json(state.store.list_budgets(user_id, period)?))
}

/// PUT /api/budgets - Create or replace a category allocation
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<NewBudgetAllocation>,
) -> Result<Json<BudgetAllocation>, AppError> {
    let user_id = get_user_id(&headers)?;
    Ok(Json(state.store.set_budget(user_id, &body)?))
}
