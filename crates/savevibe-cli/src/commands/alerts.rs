//! Budget alert command

use anyhow::Result;
use savevibe_core::{AlertLevel, Database, MonthPeriod, SpendingAlertService};

pub fn cmd_alerts(db: &Database, user_id: i64, month: u32, year: i32) -> Result<()> {
    let period = MonthPeriod::new(month, year)?;
    let alerts = SpendingAlertService::new().budget_alerts(db, user_id, period)?;

    if alerts.is_empty() {
        println!("✅ All budgets on track for {}.", period);
        return Ok(());
    }

    for alert in &alerts {
        let icon = match alert.level {
            AlertLevel::Exceeded => "🚨",
            AlertLevel::Warning => "⚠️ ",
        };
        println!(
            "{} {:<16} {:>8.2} / {:<8.2} ({:.0}%)",
            icon, alert.category, alert.spent, alert.budgeted, alert.percent_used
        );
        println!("   {}", alert.message);
    }

    Ok(())
}
