//! Spending classification command

use anyhow::Result;
use savevibe_core::{Database, MonthPeriod, SpendingClassification, SpendingClassifier};

pub fn cmd_classify(db: &Database, user_id: i64, month: u32, year: i32, json: bool) -> Result<()> {
    let period = MonthPeriod::new(month, year)?;
    let classification = SpendingClassifier::new().classify_spending(db, user_id, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
        return Ok(());
    }

    print_classification(period, &classification);
    Ok(())
}

fn print_classification(period: MonthPeriod, c: &SpendingClassification) {
    println!("📊 Spending for {}\n", period);

    if c.total_spending == 0.0 {
        println!("No spending recorded this month.");
        return;
    }

    println!("Total spending: {:>10.2}", c.total_spending);
    println!("  Necessities:  {:>10.2}", c.necessities);
    println!("  Wants:        {:>10.2}", c.wants);
    println!("  Savings:      {:>10.2}", c.savings);

    if !c.top_categories.is_empty() {
        println!("\nTop categories:");
        for share in &c.top_categories {
            println!(
                "  {:<16} {:>10.2}  ({:.1}%)",
                share.category, share.amount, share.percentage
            );
        }
    }

    if !c.patterns.is_empty() {
        println!("\nPatterns:");
        for pattern in &c.patterns {
            let kind = if pattern.is_necessity { "need" } else { "want" };
            print!(
                "  {:<16} {:<8} avg {:>8.2}  [{}]",
                pattern.category, pattern.frequency, pattern.average_amount, kind
            );
            if pattern.savings_potential > 0.0 {
                print!("  💡 could save {:.2}", pattern.savings_potential);
            }
            println!();
        }
    }

    if !c.next_month_predictions.is_empty() {
        println!("\nNext month forecast:");
        for prediction in &c.next_month_predictions {
            println!(
                "  {:<16} {:>10.2}  (confidence {:.0}%)",
                prediction.category,
                prediction.predicted_amount,
                prediction.confidence * 100.0
            );
        }
    }
}
