//! Budget alerts
//!
//! Compares each budget allocation of a month with what was actually spent in
//! that category and flags the ones nearing or over their limit.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::insights::aggregator::categorize;
use crate::models::MonthPeriod;
use crate::store::{BudgetStore, TransactionStore};

/// Percent-of-budget thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub warning_percent: f64,
    pub exceeded_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_percent: 80.0,
            exceeded_percent: 100.0,
        }
    }
}

/// How far over budget a category is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Exceeded,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAlert {
    pub category: String,
    pub budgeted: f64,
    pub spent: f64,
    pub percent_used: f64,
    pub level: AlertLevel,
    pub message: String,
}

/// Produces budget alerts for a user-month
#[derive(Debug, Clone, Default)]
pub struct SpendingAlertService {
    thresholds: AlertThresholds,
}

impl SpendingAlertService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Level for a given percent of budget used, if any
    pub fn level_for(&self, percent_used: f64) -> Option<AlertLevel> {
        if percent_used >= self.thresholds.exceeded_percent {
            Some(AlertLevel::Exceeded)
        } else if percent_used >= self.thresholds.warning_percent {
            Some(AlertLevel::Warning)
        } else {
            None
        }
    }

    /// Alerts for every budgeted category at or above the warning threshold,
    /// highest percent used first
    pub fn budget_alerts<S: TransactionStore + BudgetStore + ?Sized>(
        &self,
        store: &S,
        user_id: i64,
        period: MonthPeriod,
    ) -> Result<Vec<SpendingAlert>> {
        let budgets = store.list_budgets(user_id, period)?;
        if budgets.is_empty() {
            return Ok(vec![]);
        }

        let spent_by_category = categorize(&store.transactions_for_month(user_id, period)?);

        let mut alerts: Vec<SpendingAlert> = budgets
            .into_iter()
            .filter_map(|budget| {
                let spent = spent_by_category
                    .get(&budget.category)
                    .copied()
                    .unwrap_or(0.0);
                let percent_used = spent / budget.amount * 100.0;
                let level = self.level_for(percent_used)?;

                let message = match level {
                    AlertLevel::Exceeded => format!(
                        "You've exceeded your {} budget: spent {:.2} of {:.2}",
                        budget.category, spent, budget.amount
                    ),
                    AlertLevel::Warning => format!(
                        "You've used {:.0}% of your {} budget",
                        percent_used, budget.category
                    ),
                };

                Some(SpendingAlert {
                    category: budget.category,
                    budgeted: budget.amount,
                    spent,
                    percent_used,
                    level,
                    message,
                })
            })
            .collect();

        alerts.sort_by(|a, b| {
            b.percent_used
                .partial_cmp(&a.percent_used)
                .unwrap_or(Ordering::Equal)
        });

        debug!(user_id, period = %period, count = alerts.len(), "Budget alerts evaluated");
        Ok(alerts)
    }
}
