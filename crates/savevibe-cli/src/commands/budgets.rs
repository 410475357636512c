//! Budget commands

use anyhow::Result;
use savevibe_core::models::NewBudgetAllocation;
use savevibe_core::{BudgetStore, Database, MonthPeriod};

pub fn cmd_budget_set(
    db: &Database,
    user_id: i64,
    category: &str,
    amount: f64,
    month: u32,
    year: i32,
) -> Result<()> {
    let budget = db.set_budget(
        user_id,
        &NewBudgetAllocation {
            category: category.to_string(),
            amount,
            month,
            year,
        },
    )?;

    println!(
        "✅ Budget for {} in {}/{}: {:.2}",
        budget.category, budget.month, budget.year, budget.amount
    );
    Ok(())
}

pub fn cmd_budget_list(db: &Database, user_id: i64, month: u32, year: i32) -> Result<()> {
    let period = MonthPeriod::new(month, year)?;
    let budgets = db.list_budgets(user_id, period)?;

    if budgets.is_empty() {
        println!("No budgets set for {}.", period);
        return Ok(());
    }

    println!("💰 Budgets for {}\n", period);
    for budget in &budgets {
        println!("  {:<16} {:>10.2}", budget.category, budget.amount);
    }
    let total: f64 = budgets.iter().map(|b| b.amount).sum();
    println!("  {:<16} {:>10.2}", "total", total);

    Ok(())
}
