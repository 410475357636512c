//! Repository interfaces
//!
//! Each capability is its own trait so callers can ask for only what they
//! use (the classifier only needs `TransactionStore`). `Store` bundles them
//! all and is implemented by both backings:
//! - `MemoryStore` - arena + index maps, for tests and throwaway servers
//! - `Database` - SQLite, for persistent deployments

use crate::error::Result;
use crate::models::{
    Badge, BadgeKind, BudgetAllocation, Challenge, MonthPeriod, NewBudgetAllocation, NewChallenge,
    NewSavingsGoal, NewTransaction, SavingsGoal, Transaction,
};

mod memory;

pub use memory::MemoryStore;

/// Append-only transaction log
pub trait TransactionStore: Send + Sync {
    /// Validate and store a new transaction
    fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction>;

    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>>;

    /// All of a user's transactions, newest first
    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>>;

    /// A user's transactions dated within the month (both bounds inclusive),
    /// oldest first
    fn transactions_for_month(&self, user_id: i64, period: MonthPeriod)
        -> Result<Vec<Transaction>>;
}

/// Per-category monthly budget allocations
pub trait BudgetStore: Send + Sync {
    /// Create or replace the allocation for (user, category, month)
    fn set_budget(&self, user_id: i64, budget: &NewBudgetAllocation) -> Result<BudgetAllocation>;

    /// Allocations for a month, by category name
    fn list_budgets(&self, user_id: i64, period: MonthPeriod) -> Result<Vec<BudgetAllocation>>;
}

/// Savings goals
pub trait GoalStore: Send + Sync {
    fn create_goal(&self, user_id: i64, goal: &NewSavingsGoal) -> Result<SavingsGoal>;

    fn get_goal(&self, id: i64) -> Result<Option<SavingsGoal>>;

    fn list_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>>;

    /// Add a positive contribution; `NotFound` if the goal does not exist
    fn add_to_goal(&self, id: i64, amount: f64) -> Result<SavingsGoal>;
}

/// Challenges and badges
pub trait ChallengeStore: Send + Sync {
    fn create_challenge(&self, user_id: i64, challenge: &NewChallenge) -> Result<Challenge>;

    fn get_challenge(&self, id: i64) -> Result<Option<Challenge>>;

    fn list_challenges(&self, user_id: i64) -> Result<Vec<Challenge>>;

    /// Add to an active challenge's saved amount as one atomic step, marking
    /// it completed once the target is reached. Completed challenges reject
    /// further contributions with `InvalidData`.
    fn add_to_challenge(&self, id: i64, amount: f64) -> Result<Challenge>;

    /// Grant a badge; returns false if the user already holds it
    fn award_badge(&self, user_id: i64, kind: BadgeKind) -> Result<bool>;

    /// Badges held, in unlock order
    fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>>;
}

/// Every repository capability
pub trait Store: TransactionStore + BudgetStore + GoalStore + ChallengeStore {}

impl<T> Store for T where T: TransactionStore + BudgetStore + GoalStore + ChallengeStore + ?Sized {}

#[cfg(test)]
pub(crate) mod contract;
