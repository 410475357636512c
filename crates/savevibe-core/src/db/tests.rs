//! Database tests

use super::*;
use crate::models::*;
use crate::store::{contract, BudgetStore, ChallengeStore, TransactionStore};

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
    assert!(db.list_transactions(1).unwrap().is_empty());
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    for table in [
        "transactions",
        "budget_allocations",
        "savings_goals",
        "challenges",
        "badges",
    ] {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "missing table {}", table);
    }
}

#[test]
fn test_in_memory_removes_its_file() {
    let db = Database::in_memory().unwrap();
    let path = db.scratch.as_ref().unwrap().0.clone();
    db.insert_transaction(
        1,
        &NewTransaction::expense(5.0, "coffee", chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
    )
    .unwrap();
    assert!(path.exists());

    // Clones share the file; it goes with the last handle
    let clone = db.clone();
    drop(db);
    assert!(path.exists());
    assert_eq!(clone.count_transactions().unwrap(), 1);

    drop(clone);
    assert!(!path.exists());
    let mut wal = path.clone().into_os_string();
    wal.push("-wal");
    assert!(!std::path::Path::new(&wal).exists());
}

#[test]
fn test_reopen_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savevibe.db");
    let path = path.to_str().unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    {
        let db = Database::new_unencrypted(path).unwrap();
        db.insert_transaction(1, &NewTransaction::expense(42.0, "food", date))
            .unwrap();
    }

    // Migrations are idempotent
    let db = Database::new_unencrypted(path).unwrap();
    let txs = db.list_transactions(1).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, 42.0);
    assert_eq!(txs[0].date, date);
}

#[test]
fn test_encrypted_database_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encrypted.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path, Some("correct horse")).unwrap();
        db.set_budget(
            1,
            &NewBudgetAllocation {
                category: "rent".to_string(),
                amount: 1200.0,
                month: 1,
                year: 2024,
            },
        )
        .unwrap();
    }

    let db = Database::new_with_key(path, Some("correct horse")).unwrap();
    let budgets = db
        .list_budgets(1, MonthPeriod::new(1, 2024).unwrap())
        .unwrap();
    assert_eq!(budgets.len(), 1);

    // Wrong passphrase cannot read the schema
    assert!(Database::new_with_key(path, Some("wrong")).is_err());
}

#[test]
fn test_derive_key_is_stable() {
    let a = derive_key("passphrase").unwrap();
    let b = derive_key("passphrase").unwrap();
    let c = derive_key("other").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
}

#[test]
fn test_completed_at_stamped_once() {
    let db = Database::in_memory().unwrap();
    let challenge = db
        .create_challenge(
            1,
            &NewChallenge {
                title: "Pack lunch".to_string(),
                target_amount: 50.0,
            },
        )
        .unwrap();

    let first = db.add_to_challenge(challenge.id, 50.0).unwrap();
    assert_eq!(first.status, ChallengeStatus::Completed);
    assert!(matches!(
        db.add_to_challenge(challenge.id, 10.0),
        Err(Error::InvalidData(_))
    ));

    let stored = db.get_challenge(challenge.id).unwrap().unwrap();
    assert_eq!(stored.completed_at, first.completed_at);
    assert_eq!(stored.saved_amount, 50.0);
}

#[test]
fn test_concurrent_challenge_contributions() {
    contract::check_concurrent_challenge_contributions(&Database::in_memory().unwrap());
}

#[test]
fn test_transaction_contract() {
    contract::check_transactions(&Database::in_memory().unwrap());
}

#[test]
fn test_budget_contract() {
    contract::check_budgets(&Database::in_memory().unwrap());
}

#[test]
fn test_goal_contract() {
    contract::check_goals(&Database::in_memory().unwrap());
}

#[test]
fn test_challenge_contract() {
    contract::check_challenges(&Database::in_memory().unwrap());
}
