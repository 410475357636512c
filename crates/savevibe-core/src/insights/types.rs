//! Result types for spending classification

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Expense total per normalized category, in name order
pub type CategoryTotals = BTreeMap<String, f64>;

/// How often a category sees spending, bucketed by mean gap between transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl PatternFrequency {
    /// Upper bound (inclusive, in days) of the daily bucket
    pub const DAILY_MAX_GAP: f64 = 2.0;
    /// Upper bound (inclusive, in days) of the weekly bucket
    pub const WEEKLY_MAX_GAP: f64 = 10.0;

    pub fn from_mean_gap(days: f64) -> Self {
        if days <= Self::DAILY_MAX_GAP {
            Self::Daily
        } else if days <= Self::WEEKLY_MAX_GAP {
            Self::Weekly
        } else {
            Self::Monthly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PatternFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatternFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

/// One entry of the top-categories list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Share of total spending, 0-100
    pub percentage: f64,
}

/// A recurring spending cadence in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPattern {
    pub category: String,
    pub frequency: PatternFrequency,
    pub average_amount: f64,
    pub is_necessity: bool,
    /// Whole currency units that could plausibly be cut per transaction
    pub savings_potential: f64,
}

/// Next-month spending forecast for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPrediction {
    pub category: String,
    pub predicted_amount: f64,
    /// 0.0 - 1.0
    pub confidence: f64,
}

/// Necessity / want / savings split of one month of expenses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingBuckets {
    pub total_spending: f64,
    pub necessities: f64,
    pub wants: f64,
    pub savings: f64,
}

/// Full classification of a user's month, recomputed on every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingClassification {
    pub total_spending: f64,
    pub necessities: f64,
    pub wants: f64,
    pub savings: f64,
    pub top_categories: Vec<CategoryShare>,
    pub patterns: Vec<SpendingPattern>,
    pub next_month_predictions: Vec<SpendingPrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_boundaries() {
        assert_eq!(PatternFrequency::from_mean_gap(0.0), PatternFrequency::Daily);
        assert_eq!(PatternFrequency::from_mean_gap(2.0), PatternFrequency::Daily);
        assert_eq!(PatternFrequency::from_mean_gap(2.5), PatternFrequency::Weekly);
        assert_eq!(PatternFrequency::from_mean_gap(10.0), PatternFrequency::Weekly);
        assert_eq!(PatternFrequency::from_mean_gap(11.0), PatternFrequency::Monthly);
    }

    #[test]
    fn test_classification_json_shape() {
        let json = serde_json::to_value(SpendingClassification::default()).unwrap();
        for key in [
            "totalSpending",
            "necessities",
            "wants",
            "savings",
            "topCategories",
            "patterns",
            "nextMonthPredictions",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }
}
