//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{get_user_id, ApiJson, AppError, AppState};
use savevibe_core::models::{NewTransaction, Transaction};
use savevibe_core::{MonthPeriod, TransactionStore};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// 1-indexed month; requires `year`
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// GET /api/transactions - List transactions, optionally for one month
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user_id = get_user_id(&headers)?;

    let transactions = match (params.month, params.year) {
        (Some(month), Some(year)) => {
            let period = MonthPeriod::new(month, year)?;
            state.store.transactions_for_month(user_id, period)?
        }
        (None, None) => state.store.list_transactions(user_id)?,
        _ => {
            return Err(AppError::bad_request(
                "month and year must be given together",
            ))
        }
    };

    Ok(Json(transactions))
}

/// POST /api/transactions - Log a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    let user_id = get_user_id(&headers)?;
    let tx = state.store.insert_transaction(user_id, &body)?;

    info!(user_id, transaction_id = tx.id, kind = %tx.kind, "Transaction logged");
    Ok(Json(tx))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Transaction>, AppError> {
    let user_id = get_user_id(&headers)?;

    // Other users' transactions are reported as missing
    state
        .store
        .get_transaction(id)?
        .filter(|tx| tx.user_id == user_id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}
