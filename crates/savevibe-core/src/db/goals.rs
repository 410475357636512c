//! Savings goal operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{validate_amount, NewSavingsGoal, SavingsGoal};
use crate::store::GoalStore;

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, current_amount, deadline, created_at";

impl Database {
    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<SavingsGoal> {
        let deadline_str: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        Ok(SavingsGoal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            target_amount: row.get(3)?,
            current_amount: row.get(4)?,
            deadline: deadline_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            created_at: parse_datetime(&created_at_str),
        })
    }
}

impl GoalStore for Database {
    fn create_goal(&self, user_id: i64, goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        goal.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO savings_goals (user_id, name, target_amount, deadline) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                goal.name.trim(),
                goal.target_amount,
                goal.deadline.map(|d| d.to_string()),
            ],
        )?;
        let id = conn.last_insert_rowid();

        let goal = conn.query_row(
            &format!("SELECT {} FROM savings_goals WHERE id = ?", GOAL_COLUMNS),
            params![id],
            Self::row_to_goal,
        )?;
        Ok(goal)
    }

    fn get_goal(&self, id: i64) -> Result<Option<SavingsGoal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!("SELECT {} FROM savings_goals WHERE id = ?", GOAL_COLUMNS),
                params![id],
                Self::row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    fn list_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM savings_goals WHERE user_id = ? ORDER BY id",
            GOAL_COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![user_id], Self::row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    fn add_to_goal(&self, id: i64, amount: f64) -> Result<SavingsGoal> {
        validate_amount("amount", amount)?;
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE savings_goals SET current_amount = current_amount + ? WHERE id = ?",
            params![amount, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("savings goal {}", id)));
        }

        let goal = conn.query_row(
            &format!("SELECT {} FROM savings_goals WHERE id = ?", GOAL_COLUMNS),
            params![id],
            Self::row_to_goal,
        )?;
        Ok(goal)
    }
}
