//! CLI command tests

use chrono::NaiveDate;
use savevibe_core::{BudgetStore, Database, MonthPeriod, TransactionStore};

use crate::commands::{self, truncate, TransactionEntry};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn entry(amount: f64, category: &str, day: u32) -> TransactionEntry {
    TransactionEntry {
        amount,
        category: category.to_string(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2024, 3, day),
        income: false,
        merchant: None,
    }
}

fn march() -> MonthPeriod {
    MonthPeriod::new(3, 2024).unwrap()
}

// ========== Init Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savevibe.db");

    let result = commands::cmd_init(&path, true);
    assert!(result.is_ok());
    assert!(path.exists());

    // Reopening an initialized database works
    assert!(commands::open_db(&path, true).is_ok());
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_add_expense() {
    let db = setup_test_db();
    let mut e = entry(12.5, "Coffee", 4);
    e.description = "latte".to_string();
    e.merchant = Some("Corner Cafe".to_string());

    assert!(commands::cmd_add(&db, 1, e).is_ok());

    let txs = db.list_transactions(1).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].category, "Coffee");
    assert_eq!(txs[0].merchant.as_deref(), Some("Corner Cafe"));
    assert!(txs[0].is_expense());
}

#[test]
fn test_cmd_add_income() {
    let db = setup_test_db();
    let mut e = entry(2500.0, "salary", 1);
    e.income = true;

    assert!(commands::cmd_add(&db, 1, e).is_ok());
    assert!(!db.list_transactions(1).unwrap()[0].is_expense());
}

#[test]
fn test_cmd_add_defaults_to_today() {
    let db = setup_test_db();
    let mut e = entry(3.0, "snacks", 1);
    e.date = None;

    assert!(commands::cmd_add(&db, 1, e).is_ok());
    let today = chrono::Local::now().date_naive();
    assert_eq!(db.list_transactions(1).unwrap()[0].date, today);
}

#[test]
fn test_cmd_add_rejects_invalid_amount() {
    let db = setup_test_db();
    assert!(commands::cmd_add(&db, 1, entry(-5.0, "coffee", 4)).is_err());
    assert!(commands::cmd_add(&db, 1, entry(5.0, "  ", 4)).is_err());
    assert!(db.list_transactions(1).unwrap().is_empty());
}

#[test]
fn test_cmd_transactions_list() {
    let db = setup_test_db();
    commands::cmd_add(&db, 1, entry(10.0, "groceries", 2)).unwrap();
    commands::cmd_add(&db, 1, entry(20.0, "dining", 9)).unwrap();

    assert!(commands::cmd_transactions_list(&db, 1, None).is_ok());
    assert!(commands::cmd_transactions_list(&db, 1, Some((3, 2024))).is_ok());
    assert!(commands::cmd_transactions_list(&db, 2, None).is_ok());
}

#[test]
fn test_cmd_transactions_list_invalid_month() {
    let db = setup_test_db();
    assert!(commands::cmd_transactions_list(&db, 1, Some((13, 2024))).is_err());
}

// ========== Classification Tests ==========

#[test]
fn test_cmd_classify() {
    let db = setup_test_db();
    commands::cmd_add(&db, 1, entry(120.0, "groceries", 2)).unwrap();
    commands::cmd_add(&db, 1, entry(45.0, "dining", 5)).unwrap();
    commands::cmd_add(&db, 1, entry(45.0, "dining", 12)).unwrap();

    assert!(commands::cmd_classify(&db, 1, 3, 2024, false).is_ok());
    assert!(commands::cmd_classify(&db, 1, 3, 2024, true).is_ok());
}

#[test]
fn test_cmd_classify_empty_month() {
    let db = setup_test_db();
    assert!(commands::cmd_classify(&db, 1, 3, 2024, false).is_ok());
}

#[test]
fn test_cmd_classify_invalid_month() {
    let db = setup_test_db();
    assert!(commands::cmd_classify(&db, 1, 0, 2024, false).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budget_set_and_list() {
    let db = setup_test_db();
    assert!(commands::cmd_budget_set(&db, 1, "Dining", 200.0, 3, 2024).is_ok());
    assert!(commands::cmd_budget_set(&db, 1, "dining", 250.0, 3, 2024).is_ok());

    let budgets = db.list_budgets(1, march()).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, 250.0);

    assert!(commands::cmd_budget_list(&db, 1, 3, 2024).is_ok());
    assert!(commands::cmd_budget_list(&db, 1, 4, 2024).is_ok());
}

#[test]
fn test_cmd_budget_set_invalid() {
    let db = setup_test_db();
    assert!(commands::cmd_budget_set(&db, 1, "dining", 0.0, 3, 2024).is_err());
    assert!(commands::cmd_budget_set(&db, 1, "dining", 100.0, 13, 2024).is_err());
}

#[test]
fn test_cmd_alerts() {
    let db = setup_test_db();
    commands::cmd_budget_set(&db, 1, "dining", 100.0, 3, 2024).unwrap();
    assert!(commands::cmd_alerts(&db, 1, 3, 2024).is_ok());

    commands::cmd_add(&db, 1, entry(95.0, "dining", 10)).unwrap();
    assert!(commands::cmd_alerts(&db, 1, 3, 2024).is_ok());

    assert!(commands::cmd_alerts(&db, 1, 0, 2024).is_err());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer description", 10), "a much ...");
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
}
