//! Spending classifier - runs the insight pipeline for one user-month

use tracing::debug;

use crate::error::Result;
use crate::models::{MonthPeriod, Transaction};
use crate::store::TransactionStore;

use super::aggregator::{bucket_totals, categorize, top_categories};
use super::forecaster::{Forecaster, HeuristicForecaster};
use super::patterns::identify_patterns;
use super::types::SpendingClassification;

/// Builds a `SpendingClassification` from a month of transactions
pub struct SpendingClassifier {
    forecaster: Box<dyn Forecaster>,
}

impl Default for SpendingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SpendingClassifier {
    /// Classifier with the heuristic forecaster, seeded from the environment if configured
    pub fn new() -> Self {
        Self::with_forecaster(Box::new(HeuristicForecaster::from_env()))
    }

    pub fn with_forecaster(forecaster: Box<dyn Forecaster>) -> Self {
        Self { forecaster }
    }

    pub fn forecaster_name(&self) -> &'static str {
        self.forecaster.name()
    }

    /// Classify a user's spending for one month
    pub fn classify_spending<S: TransactionStore + ?Sized>(
        &self,
        store: &S,
        user_id: i64,
        period: MonthPeriod,
    ) -> Result<SpendingClassification> {
        let transactions = store.transactions_for_month(user_id, period)?;
        let classification = self.classify_transactions(&transactions);

        debug!(
            user_id,
            period = %period,
            transactions = transactions.len(),
            categories = classification.top_categories.len(),
            patterns = classification.patterns.len(),
            "Spending classified"
        );

        Ok(classification)
    }

    /// Classify an already-loaded set of transactions
    pub fn classify_transactions(&self, transactions: &[Transaction]) -> SpendingClassification {
        let categorized = categorize(transactions);
        if categorized.is_empty() {
            return SpendingClassification::default();
        }

        let buckets = bucket_totals(&categorized);

        SpendingClassification {
            total_spending: buckets.total_spending,
            necessities: buckets.necessities,
            wants: buckets.wants,
            savings: buckets.savings,
            top_categories: top_categories(&categorized, buckets.total_spending),
            patterns: identify_patterns(&categorized, transactions),
            next_month_predictions: self
                .forecaster
                .predict_next_month(&categorized, transactions),
        }
    }
}
