//! Monthly spending aggregation
//!
//! Only expense transactions count toward any total. Income rows are
//! skipped everywhere in the classification.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{normalize_category, Transaction};

use super::necessity::{is_necessity, is_savings_category};
use super::types::{CategoryShare, CategoryTotals, SpendingBuckets};

/// Number of entries in the top-categories list
pub const TOP_CATEGORY_COUNT: usize = 5;

/// Group expense transactions by normalized category
pub(crate) fn group_by_category(transactions: &[Transaction]) -> BTreeMap<String, Vec<&Transaction>> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        groups
            .entry(normalize_category(&tx.category))
            .or_default()
            .push(tx);
    }
    groups
}

/// Sum expense amounts per normalized category
pub fn categorize(transactions: &[Transaction]) -> CategoryTotals {
    group_by_category(transactions)
        .into_iter()
        .map(|(category, txs)| {
            let total = txs.iter().map(|tx| tx.amount).sum();
            (category, total)
        })
        .collect()
}

/// Split category totals into savings, necessities and wants
pub fn bucket_totals(categorized: &CategoryTotals) -> SpendingBuckets {
    let mut buckets = SpendingBuckets::default();

    for (category, amount) in categorized {
        buckets.total_spending += amount;
        if is_savings_category(category) {
            buckets.savings += amount;
        } else if is_necessity(category) {
            buckets.necessities += amount;
        } else {
            buckets.wants += amount;
        }
    }

    buckets
}

/// Largest categories with their share of total spending
pub fn top_categories(categorized: &CategoryTotals, total_spending: f64) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = categorized
        .iter()
        .map(|(category, &amount)| CategoryShare {
            category: category.clone(),
            amount,
            percentage: if total_spending > 0.0 {
                amount / total_spending * 100.0
            } else {
                0.0
            },
        })
        .collect();

    // Stable sort keeps name order among equal amounts
    shares.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    shares.truncate(TOP_CATEGORY_COUNT);
    shares
}
