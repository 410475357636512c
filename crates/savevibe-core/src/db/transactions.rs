//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{MonthPeriod, NewTransaction, Transaction};
use crate::store::TransactionStore;

const TRANSACTION_COLUMNS: &str =
    "id, user_id, amount, category, description, date, type, is_want, merchant, created_at";

impl Database {
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(5)?;
        let type_str: String = row.get(6)?;
        let is_want_int: i64 = row.get(7)?;
        let created_at_str: String = row.get(9)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            kind: type_str.parse().unwrap_or_default(),
            is_want: is_want_int != 0,
            merchant: row.get(8)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Count all stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl TransactionStore for Database {
    fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, amount, category, description, date, type, is_want, merchant)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.amount,
                tx.category.trim(),
                tx.description,
                tx.date.to_string(),
                tx.kind.as_str(),
                tx.resolved_is_want(),
                tx.merchant,
            ],
        )?;
        let id = conn.last_insert_rowid();

        let tx = conn.query_row(
            &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
            params![id],
            Self::row_to_transaction,
        )?;
        Ok(tx)
    }

    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let txs = stmt
            .query_map(params![user_id], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    fn transactions_for_month(
        &self,
        user_id: i64,
        period: MonthPeriod,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM transactions
            WHERE user_id = ? AND date >= ? AND date <= ?
            ORDER BY date ASC, id ASC
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let txs = stmt
            .query_map(
                params![
                    user_id,
                    period.first_day().to_string(),
                    period.last_day().to_string()
                ],
                Self::row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }
}
