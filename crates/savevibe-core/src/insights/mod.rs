//! Spending insights
//!
//! Turns a month of transactions into a `SpendingClassification`:
//!
//! - **Necessity table** - labels categories as necessities or wants
//! - **Aggregator** - per-category totals, bucket split, top categories
//! - **Pattern detector** - spending cadence and savings potential
//! - **Forecaster** - next-month predictions behind a trait
//!
//! ## Usage
//!
//! ```rust,ignore
//! use savevibe_core::insights::SpendingClassifier;
//!
//! let classifier = SpendingClassifier::new();
//! let result = classifier.classify_spending(&store, user_id, MonthPeriod::new(3, 2024)?)?;
//! ```

pub mod aggregator;
pub mod engine;
pub mod forecaster;
pub mod necessity;
pub mod patterns;
pub mod types;

pub use engine::SpendingClassifier;
pub use forecaster::{Forecaster, HeuristicForecaster, FORECAST_SEED_ENV};
pub use necessity::{is_necessity, is_savings_category};
pub use types::{
    CategoryShare, CategoryTotals, PatternFrequency, SpendingBuckets, SpendingClassification,
    SpendingPattern, SpendingPrediction,
};
