//! SaveVibe Core Library
//!
//! Shared functionality for the SaveVibe personal finance tracker:
//! - Domain models and month handling
//! - Storage traits with in-memory and SQLite backings
//! - Spending classification (buckets, patterns, forecasts)
//! - Budget alerts
//! - Savings challenges and badges

pub mod alerts;
pub mod db;
pub mod error;
pub mod gamification;
pub mod insights;
pub mod models;
pub mod store;

pub use alerts::{AlertLevel, AlertThresholds, SpendingAlert, SpendingAlertService};
pub use db::Database;
pub use error::{Error, Result};
pub use gamification::{ContributionOutcome, GamificationService};
pub use insights::{SpendingClassification, SpendingClassifier};
pub use models::MonthPeriod;
pub use store::{BudgetStore, ChallengeStore, GoalStore, MemoryStore, Store, TransactionStore};
