//! Spending classification and budget alert handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::{get_user_id, AppError, AppState};
use savevibe_core::{MonthPeriod, SpendingAlert, SpendingClassification};

/// GET /api/ai/spending-classification/:month/:year - Classify a month of spending
///
/// `month` is 1-indexed (January = 1).
pub async fn get_spending_classification(
    State(state): State<Arc<AppState>>,
    Path((month, year)): Path<(u32, i32)>,
    headers: HeaderMap,
) -> Result<Json<SpendingClassification>, AppError> {
    let user_id = get_user_id(&headers)?;
    let period = MonthPeriod::new(month, year)?;

    let classification = state
        .classifier
        .classify_spending(state.store.as_ref(), user_id, period)?;
    Ok(Json(classification))
}

/// GET /api/alerts/:month/:year - Budget alerts for a month
pub async fn get_budget_alerts(
    State(state): State<Arc<AppState>>,
    Path((month, year)): Path<(u32, i32)>,
    headers: HeaderMap,
) -> Result<Json<Vec<SpendingAlert>>, AppError> {
    let user_id = get_user_id(&headers)?;
    let period = MonthPeriod::new(month, year)?;

    let alerts = state
        .alerts
        .budget_alerts(state.store.as_ref(), user_id, period)?;
    Ok(Json(alerts))
}
