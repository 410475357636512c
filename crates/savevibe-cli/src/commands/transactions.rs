//! Transaction commands

use anyhow::Result;
use chrono::{Local, NaiveDate};
use savevibe_core::models::{NewTransaction, Transaction, TransactionType};
use savevibe_core::{Database, MonthPeriod, TransactionStore};

use super::truncate;

/// Parsed arguments of `savevibe add`
#[derive(Debug, Clone)]
pub struct TransactionEntry {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub income: bool,
    pub merchant: Option<String>,
}

impl TransactionEntry {
    fn into_new_transaction(self) -> NewTransaction {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut tx = if self.income {
            NewTransaction::income(self.amount, &self.category, date)
        } else {
            NewTransaction::expense(self.amount, &self.category, date)
        };
        tx = tx.with_description(self.description);
        if let Some(merchant) = self.merchant {
            tx = tx.with_merchant(merchant);
        }
        tx
    }
}

pub fn cmd_add(db: &Database, user_id: i64, entry: TransactionEntry) -> Result<()> {
    let tx = db.insert_transaction(user_id, &entry.into_new_transaction())?;

    println!(
        "✅ Logged {} #{}: {} {:.2} ({})",
        tx.kind,
        tx.id,
        tx.date,
        tx.amount,
        tx.category
    );
    if tx.is_want {
        println!("   🛍️  Counted as a want");
    }

    Ok(())
}

pub fn cmd_transactions_list(
    db: &Database,
    user_id: i64,
    period: Option<(u32, i32)>,
) -> Result<()> {
    let transactions = match period {
        Some((month, year)) => {
            let period = MonthPeriod::new(month, year)?;
            db.transactions_for_month(user_id, period)?
        }
        None => db.list_transactions(user_id)?,
    };

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<10} {:>10}  {:<14} {:<30}",
        "ID", "Date", "Amount", "Category", "Description"
    );
    println!("{}", "-".repeat(74));
    for tx in &transactions {
        println!("{}", format_row(tx));
    }
    println!("\n{} transaction(s)", transactions.len());

    Ok(())
}

fn format_row(tx: &Transaction) -> String {
    let amount = match tx.kind {
        TransactionType::Income => format!("+{:.2}", tx.amount),
        TransactionType::Expense => format!("-{:.2}", tx.amount),
    };
    let description = match &tx.merchant {
        Some(merchant) if tx.description.is_empty() => merchant.clone(),
        Some(merchant) => format!("{} @ {}", tx.description, merchant),
        None => tx.description.clone(),
    };
    format!(
        "{:<6} {:<10} {:>10}  {:<14} {:<30}",
        tx.id,
        tx.date,
        amount,
        truncate(&tx.category, 14),
        truncate(&description, 30)
    )
}
