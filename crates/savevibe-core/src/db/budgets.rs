//! Budget allocation operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{normalize_category, BudgetAllocation, MonthPeriod, NewBudgetAllocation};
use crate::store::BudgetStore;

const BUDGET_COLUMNS: &str = "id, user_id, category, amount, month, year, created_at";

impl Database {
    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<BudgetAllocation> {
        let created_at_str: String = row.get(6)?;
        Ok(BudgetAllocation {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            month: row.get(4)?,
            year: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}

impl BudgetStore for Database {
    fn set_budget(&self, user_id: i64, budget: &NewBudgetAllocation) -> Result<BudgetAllocation> {
        let period = budget.validate()?;
        let category = normalize_category(&budget.category);
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO budget_allocations (user_id, category, amount, month, year)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, category, month, year) DO UPDATE SET amount = excluded.amount
            "#,
            params![
                user_id,
                category,
                budget.amount,
                period.month(),
                period.year()
            ],
        )?;

        let allocation = conn.query_row(
            &format!(
                "SELECT {} FROM budget_allocations
                 WHERE user_id = ? AND category = ? AND month = ? AND year = ?",
                BUDGET_COLUMNS
            ),
            params![user_id, category, period.month(), period.year()],
            Self::row_to_budget,
        )?;
        Ok(allocation)
    }

    fn list_budgets(&self, user_id: i64, period: MonthPeriod) -> Result<Vec<BudgetAllocation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budget_allocations
             WHERE user_id = ? AND month = ? AND year = ?
             ORDER BY category",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(
                params![user_id, period.month(), period.year()],
                Self::row_to_budget,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }
}
