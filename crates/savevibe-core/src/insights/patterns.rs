//! Recurring spending pattern detection
//!
//! For each category with at least two expenses in the month, the mean gap
//! between consecutive transactions picks a frequency bucket, and a fixed
//! share of the average amount is reported as savings potential.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::Transaction;

use super::aggregator::group_by_category;
use super::necessity::is_necessity;
use super::types::{CategoryTotals, PatternFrequency, SpendingPattern};

/// Share of an average necessity transaction that could be saved
pub const NECESSITY_SAVINGS_RATE: f64 = 0.05;
/// Share of an average want transaction that could be saved
pub const WANT_SAVINGS_RATE: f64 = 0.25;
/// Fewer transactions than this cannot establish a cadence
pub const MIN_PATTERN_TRANSACTIONS: usize = 2;

/// Mean number of days between consecutive transactions (sorted ascending by date)
fn mean_gap_days(sorted: &[&Transaction]) -> f64 {
    let gaps: Vec<i64> = sorted
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days())
        .collect();

    if gaps.is_empty() {
        return 0.0;
    }
    gaps.iter().sum::<i64>() as f64 / gaps.len() as f64
}

/// Rounded savings potential for one average transaction
pub fn savings_potential(average_amount: f64, necessity: bool) -> f64 {
    let rate = if necessity {
        NECESSITY_SAVINGS_RATE
    } else {
        WANT_SAVINGS_RATE
    };
    (average_amount * rate).round()
}

/// Detect spending cadences for the categories present in `categorized`
pub fn identify_patterns(
    categorized: &CategoryTotals,
    transactions: &[Transaction],
) -> Vec<SpendingPattern> {
    let mut patterns: Vec<SpendingPattern> = group_by_category(transactions)
        .into_iter()
        .filter(|(category, txs)| {
            categorized.contains_key(category) && txs.len() >= MIN_PATTERN_TRANSACTIONS
        })
        .map(|(category, mut txs)| {
            txs.sort_by_key(|tx| tx.date);

            let mean_gap = mean_gap_days(&txs);
            let average_amount = txs.iter().map(|tx| tx.amount).sum::<f64>() / txs.len() as f64;
            let necessity = is_necessity(&category);

            debug!(
                category = %category,
                count = txs.len(),
                mean_gap,
                "Spending pattern detected"
            );

            SpendingPattern {
                frequency: PatternFrequency::from_mean_gap(mean_gap),
                average_amount,
                is_necessity: necessity,
                savings_potential: savings_potential(average_amount, necessity),
                category,
            }
        })
        .collect();

    patterns.sort_by(|a, b| {
        b.savings_potential
            .partial_cmp(&a.savings_potential)
            .unwrap_or(Ordering::Equal)
    });
    patterns
}
