//! In-memory store
//!
//! Records live in per-entity arenas; an entity's ID is its arena position
//! plus one. Per-user index maps avoid scanning every arena on reads.
//! Nothing is persisted.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{
    normalize_category, validate_amount, Badge, BadgeKind, BudgetAllocation, Challenge,
    ChallengeStatus, MonthPeriod, NewBudgetAllocation, NewChallenge, NewSavingsGoal,
    NewTransaction, SavingsGoal, Transaction,
};

use super::{BudgetStore, ChallengeStore, GoalStore, TransactionStore};

type BudgetKey = (i64, String, u32, i32);

#[derive(Default)]
struct Tables {
    transactions: Vec<Transaction>,
    transactions_by_user: HashMap<i64, Vec<usize>>,
    budgets: Vec<BudgetAllocation>,
    budget_index: HashMap<BudgetKey, usize>,
    goals: Vec<SavingsGoal>,
    goals_by_user: HashMap<i64, Vec<usize>>,
    challenges: Vec<Challenge>,
    challenges_by_user: HashMap<i64, Vec<usize>>,
    badges: Vec<Badge>,
}

/// Arena position for a store-assigned ID
fn slot(id: i64) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1)
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

/// Process-local store backed by plain collections
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

impl TransactionStore for MemoryStore {
    fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;
        let mut tables = self.write()?;

        let record = Transaction {
            id: next_id(tables.transactions.len()),
            user_id,
            amount: tx.amount,
            category: tx.category.trim().to_string(),
            description: tx.description.clone(),
            date: tx.date,
            kind: tx.kind,
            is_want: tx.resolved_is_want(),
            merchant: tx.merchant.clone(),
            created_at: Utc::now(),
        };

        let position = tables.transactions.len();
        tables.transactions.push(record.clone());
        tables
            .transactions_by_user
            .entry(user_id)
            .or_default()
            .push(position);

        Ok(record)
    }

    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let tables = self.read()?;
        Ok(slot(id).and_then(|i| tables.transactions.get(i)).cloned())
    }

    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let tables = self.read()?;
        let mut txs: Vec<Transaction> = tables
            .transactions_by_user
            .get(&user_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&i| tables.transactions[i].clone())
                    .collect()
            })
            .unwrap_or_default();

        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(txs)
    }

    fn transactions_for_month(
        &self,
        user_id: i64,
        period: MonthPeriod,
    ) -> Result<Vec<Transaction>> {
        let tables = self.read()?;
        let mut txs: Vec<Transaction> = tables
            .transactions_by_user
            .get(&user_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&i| &tables.transactions[i])
                    .filter(|tx| period.contains(tx.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(txs)
    }
}

impl BudgetStore for MemoryStore {
    fn set_budget(&self, user_id: i64, budget: &NewBudgetAllocation) -> Result<BudgetAllocation> {
        let period = budget.validate()?;
        let category = normalize_category(&budget.category);
        let key = (user_id, category.clone(), period.month(), period.year());

        let mut tables = self.write()?;
        if let Some(&i) = tables.budget_index.get(&key) {
            let existing = &mut tables.budgets[i];
            existing.amount = budget.amount;
            return Ok(existing.clone());
        }

        let record = BudgetAllocation {
            id: next_id(tables.budgets.len()),
            user_id,
            category,
            amount: budget.amount,
            month: period.month(),
            year: period.year(),
            created_at: Utc::now(),
        };
        let position = tables.budgets.len();
        tables.budgets.push(record.clone());
        tables.budget_index.insert(key, position);
        Ok(record)
    }

    fn list_budgets(&self, user_id: i64, period: MonthPeriod) -> Result<Vec<BudgetAllocation>> {
        let tables = self.read()?;
        let mut budgets: Vec<BudgetAllocation> = tables
            .budgets
            .iter()
            .filter(|b| {
                b.user_id == user_id && b.month == period.month() && b.year == period.year()
            })
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(budgets)
    }
}

impl GoalStore for MemoryStore {
    fn create_goal(&self, user_id: i64, goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        goal.validate()?;
        let mut tables = self.write()?;

        let record = SavingsGoal {
            id: next_id(tables.goals.len()),
            user_id,
            name: goal.name.trim().to_string(),
            target_amount: goal.target_amount,
            current_amount: 0.0,
            deadline: goal.deadline,
            created_at: Utc::now(),
        };
        let position = tables.goals.len();
        tables.goals.push(record.clone());
        tables.goals_by_user.entry(user_id).or_default().push(position);
        Ok(record)
    }

    fn get_goal(&self, id: i64) -> Result<Option<SavingsGoal>> {
        let tables = self.read()?;
        Ok(slot(id).and_then(|i| tables.goals.get(i)).cloned())
    }

    fn list_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let tables = self.read()?;
        Ok(tables
            .goals_by_user
            .get(&user_id)
            .map(|positions| positions.iter().map(|&i| tables.goals[i].clone()).collect())
            .unwrap_or_default())
    }

    fn add_to_goal(&self, id: i64, amount: f64) -> Result<SavingsGoal> {
        validate_amount("amount", amount)?;
        let mut tables = self.write()?;
        let goal = slot(id)
            .and_then(|i| tables.goals.get_mut(i))
            .ok_or_else(|| Error::NotFound(format!("savings goal {}", id)))?;
        goal.current_amount += amount;
        Ok(goal.clone())
    }
}

impl ChallengeStore for MemoryStore {
    fn create_challenge(&self, user_id: i64, challenge: &NewChallenge) -> Result<Challenge> {
        challenge.validate()?;
        let mut tables = self.write()?;

        let record = Challenge {
            id: next_id(tables.challenges.len()),
            user_id,
            title: challenge.title.trim().to_string(),
            target_amount: challenge.target_amount,
            saved_amount: 0.0,
            status: ChallengeStatus::Active,
            created_at: Utc::now(),
            completed_at: None,
        };
        let position = tables.challenges.len();
        tables.challenges.push(record.clone());
        tables
            .challenges_by_user
            .entry(user_id)
            .or_default()
            .push(position);
        Ok(record)
    }

    fn get_challenge(&self, id: i64) -> Result<Option<Challenge>> {
        let tables = self.read()?;
        Ok(slot(id).and_then(|i| tables.challenges.get(i)).cloned())
    }

    fn list_challenges(&self, user_id: i64) -> Result<Vec<Challenge>> {
        let tables = self.read()?;
        Ok(tables
            .challenges_by_user
            .get(&user_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&i| tables.challenges[i].clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn add_to_challenge(&self, id: i64, amount: f64) -> Result<Challenge> {
        validate_amount("amount", amount)?;

        // Read, check and increment under one guard
        let mut tables = self.write()?;
        let challenge = slot(id)
            .and_then(|i| tables.challenges.get_mut(i))
            .ok_or_else(|| Error::NotFound(format!("challenge {}", id)))?;
        if challenge.status == ChallengeStatus::Completed {
            return Err(Error::InvalidData(format!(
                "challenge {} is already completed",
                id
            )));
        }

        challenge.saved_amount += amount;
        if challenge.saved_amount >= challenge.target_amount {
            challenge.status = ChallengeStatus::Completed;
            challenge.completed_at = Some(Utc::now());
        }
        Ok(challenge.clone())
    }

    fn award_badge(&self, user_id: i64, kind: BadgeKind) -> Result<bool> {
        let mut tables = self.write()?;
        if tables
            .badges
            .iter()
            .any(|b| b.user_id == user_id && b.kind == kind)
        {
            return Ok(false);
        }
        tables.badges.push(Badge {
            user_id,
            kind,
            unlocked_at: Utc::now(),
        });
        Ok(true)
    }

    fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>> {
        let tables = self.read()?;
        Ok(tables
            .badges
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}
