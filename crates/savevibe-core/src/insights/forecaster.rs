//! Next-month spending forecasts
//!
//! `HeuristicForecaster` is not a trained model: it perturbs the current
//! month's category totals by a bounded random variance. It sits behind the
//! `Forecaster` trait so a real model can replace it without touching callers.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::models::Transaction;

use super::aggregator::group_by_category;
use super::types::{CategoryTotals, SpendingPrediction};

/// Environment variable holding an optional forecast seed
pub const FORECAST_SEED_ENV: &str = "SAVEVIBE_FORECAST_SEED";

/// Maximum number of predictions returned
pub const MAX_PREDICTIONS: usize = 5;
/// Largest relative change applied to a category total (either direction)
pub const MAX_VARIANCE: f64 = 0.10;
/// Ceiling on the count-derived part of the confidence score
pub const MAX_BASE_CONFIDENCE: f64 = 0.9;
/// Upper bound (exclusive) of the random confidence jitter
pub const CONFIDENCE_JITTER: f64 = 0.1;

/// Produces per-category forecasts for the month after the analyzed one
pub trait Forecaster: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Forecast from the current month's category totals and its transactions
    fn predict_next_month(
        &self,
        categorized: &CategoryTotals,
        transactions: &[Transaction],
    ) -> Vec<SpendingPrediction>;
}

/// Random-variance forecaster
#[derive(Debug, Clone, Default)]
pub struct HeuristicForecaster {
    /// Fixed seed for reproducible output; fresh entropy per call when unset
    seed: Option<u64>,
}

impl HeuristicForecaster {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Read `SAVEVIBE_FORECAST_SEED`; an unparseable value is logged and ignored
    pub fn from_env() -> Self {
        match std::env::var(FORECAST_SEED_ENV) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => Self::seeded(seed),
                Err(_) => {
                    warn!(value = %raw, "Ignoring invalid {}", FORECAST_SEED_ENV);
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Core heuristic over an explicit random source
    pub fn predict_with<R: Rng>(
        rng: &mut R,
        categorized: &CategoryTotals,
        transactions: &[Transaction],
    ) -> Vec<SpendingPrediction> {
        let groups = group_by_category(transactions);

        let mut predictions: Vec<SpendingPrediction> = categorized
            .iter()
            .filter_map(|(category, &current)| {
                let count = groups.get(category).map_or(0, |txs| txs.len());
                if count == 0 {
                    return None;
                }

                let variance = rng.gen_range(-MAX_VARIANCE..=MAX_VARIANCE);
                let predicted_amount = (current * (1.0 + variance)).round();

                let base = (count as f64 / 10.0).min(MAX_BASE_CONFIDENCE);
                let jitter = rng.gen_range(0.0..CONFIDENCE_JITTER);
                let confidence = (((base + jitter) * 100.0).round() / 100.0).min(1.0);

                Some(SpendingPrediction {
                    category: category.clone(),
                    predicted_amount,
                    confidence,
                })
            })
            .collect();

        predictions.sort_by(|a, b| {
            b.predicted_amount
                .partial_cmp(&a.predicted_amount)
                .unwrap_or(Ordering::Equal)
        });
        predictions.truncate(MAX_PREDICTIONS);
        predictions
    }
}

impl Forecaster for HeuristicForecaster {
    fn name(&self) -> &'static str {
        "Heuristic Variance Forecaster"
    }

    fn predict_next_month(
        &self,
        categorized: &CategoryTotals,
        transactions: &[Transaction],
    ) -> Vec<SpendingPrediction> {
        let mut rng = self.rng();
        Self::predict_with(&mut rng, categorized, transactions)
    }
}
