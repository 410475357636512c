//! Behavior every `Store` backing must share
//!
//! Each backing's test module calls these against a fresh, empty store.

use chrono::NaiveDate;

use crate::error::Error;
use crate::models::{
    BadgeKind, ChallengeStatus, MonthPeriod, NewBudgetAllocation, NewChallenge, NewSavingsGoal,
    NewTransaction,
};

use super::Store;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn check_transactions<S: Store + ?Sized>(store: &S) {
    let first = store
        .insert_transaction(1, &NewTransaction::expense(12.5, "Coffee", date(2024, 3, 1)))
        .unwrap();
    assert!(first.id > 0);
    assert_eq!(first.user_id, 1);
    assert!(first.is_want);

    let rent = store
        .insert_transaction(
            1,
            &NewTransaction::expense(1200.0, "rent", date(2024, 3, 31)).with_merchant("Landlord"),
        )
        .unwrap();
    assert!(!rent.is_want);
    assert_eq!(rent.merchant.as_deref(), Some("Landlord"));

    store
        .insert_transaction(1, &NewTransaction::income(3000.0, "salary", date(2024, 4, 1)))
        .unwrap();
    store
        .insert_transaction(1, &NewTransaction::expense(9.0, "coffee", date(2024, 2, 29)))
        .unwrap();
    store
        .insert_transaction(2, &NewTransaction::expense(50.0, "dining", date(2024, 3, 15)))
        .unwrap();

    // Explicit flag wins over the category table
    let mut treat = NewTransaction::expense(30.0, "groceries", date(2024, 3, 10));
    treat.is_want = Some(true);
    assert!(store.insert_transaction(1, &treat).unwrap().is_want);

    let fetched = store.get_transaction(first.id).unwrap().unwrap();
    assert_eq!(fetched.category, "Coffee");
    assert_eq!(fetched.amount, 12.5);
    assert!(store.get_transaction(9999).unwrap().is_none());

    let march = MonthPeriod::new(3, 2024).unwrap();
    let month = store.transactions_for_month(1, march).unwrap();
    let dates: Vec<NaiveDate> = month.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 3, 1), date(2024, 3, 10), date(2024, 3, 31)]
    );
    assert!(month.iter().all(|t| t.user_id == 1));

    let all = store.list_transactions(1).unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].date, date(2024, 4, 1));
    assert!(all.windows(2).all(|w| w[0].date >= w[1].date));

    assert!(store.list_transactions(42).unwrap().is_empty());

    let bad = NewTransaction::expense(-5.0, "food", date(2024, 3, 1));
    assert!(matches!(
        store.insert_transaction(1, &bad),
        Err(Error::InvalidData(_))
    ));
    let blank = NewTransaction::expense(5.0, "  ", date(2024, 3, 1));
    assert!(matches!(
        store.insert_transaction(1, &blank),
        Err(Error::InvalidData(_))
    ));
}

pub(crate) fn check_budgets<S: Store + ?Sized>(store: &S) {
    let groceries = NewBudgetAllocation {
        category: "Groceries".to_string(),
        amount: 400.0,
        month: 5,
        year: 2024,
    };
    let created = store.set_budget(1, &groceries).unwrap();
    assert_eq!(created.category, "groceries");
    assert_eq!(created.month, 5);

    // Same (user, category, month) replaces the amount
    let updated = store
        .set_budget(
            1,
            &NewBudgetAllocation {
                amount: 450.0,
                category: "groceries".to_string(),
                ..groceries.clone()
            },
        )
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.amount, 450.0);

    store
        .set_budget(
            1,
            &NewBudgetAllocation {
                category: "dining".to_string(),
                amount: 120.0,
                month: 5,
                year: 2024,
            },
        )
        .unwrap();
    store
        .set_budget(
            1,
            &NewBudgetAllocation {
                month: 6,
                ..groceries.clone()
            },
        )
        .unwrap();
    store.set_budget(2, &groceries).unwrap();

    let may = store
        .list_budgets(1, MonthPeriod::new(5, 2024).unwrap())
        .unwrap();
    let names: Vec<&str> = may.iter().map(|b| b.category.as_str()).collect();
    assert_eq!(names, vec!["dining", "groceries"]);
    assert_eq!(may[1].amount, 450.0);

    assert!(store
        .list_budgets(1, MonthPeriod::new(7, 2024).unwrap())
        .unwrap()
        .is_empty());

    let bad_month = NewBudgetAllocation {
        month: 13,
        ..groceries
    };
    assert!(matches!(
        store.set_budget(1, &bad_month),
        Err(Error::InvalidData(_))
    ));
}

pub(crate) fn check_goals<S: Store + ?Sized>(store: &S) {
    let goal = store
        .create_goal(
            1,
            &NewSavingsGoal {
                name: "Emergency fund".to_string(),
                target_amount: 1000.0,
                deadline: Some(date(2024, 12, 31)),
            },
        )
        .unwrap();
    assert_eq!(goal.current_amount, 0.0);

    let goal = store.add_to_goal(goal.id, 250.0).unwrap();
    let goal = store.add_to_goal(goal.id, 100.0).unwrap();
    assert_eq!(goal.current_amount, 350.0);
    assert_eq!(goal.progress_percent(), 35.0);

    let fetched = store.get_goal(goal.id).unwrap().unwrap();
    assert_eq!(fetched.current_amount, 350.0);
    assert_eq!(fetched.deadline, Some(date(2024, 12, 31)));

    assert!(matches!(
        store.add_to_goal(goal.id, 0.0),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        store.add_to_goal(9999, 10.0),
        Err(Error::NotFound(_))
    ));

    assert_eq!(store.list_goals(1).unwrap().len(), 1);
    assert!(store.list_goals(2).unwrap().is_empty());
}

pub(crate) fn check_challenges<S: Store + ?Sized>(store: &S) {
    let challenge = store
        .create_challenge(
            1,
            &NewChallenge {
                title: "No takeout week".to_string(),
                target_amount: 100.0,
            },
        )
        .unwrap();
    assert_eq!(challenge.status, ChallengeStatus::Active);
    assert!(challenge.completed_at.is_none());

    let progressed = store.add_to_challenge(challenge.id, 40.0).unwrap();
    assert_eq!(progressed.saved_amount, 40.0);
    assert_eq!(progressed.status, ChallengeStatus::Active);
    assert!(progressed.completed_at.is_none());

    // Overshooting the target completes the challenge
    let done = store.add_to_challenge(challenge.id, 65.0).unwrap();
    assert_eq!(done.saved_amount, 105.0);
    assert_eq!(done.status, ChallengeStatus::Completed);
    assert!(done.completed_at.is_some());

    let fetched = store.get_challenge(challenge.id).unwrap().unwrap();
    assert_eq!(fetched.status, ChallengeStatus::Completed);
    assert_eq!(fetched.completed_at, done.completed_at);
    assert_eq!(store.list_challenges(1).unwrap().len(), 1);

    // Completed challenges are closed and keep their totals
    assert!(matches!(
        store.add_to_challenge(challenge.id, 10.0),
        Err(Error::InvalidData(_))
    ));
    assert_eq!(
        store.get_challenge(challenge.id).unwrap().unwrap().saved_amount,
        105.0
    );

    assert!(matches!(
        store.add_to_challenge(9999, 1.0),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        store.add_to_challenge(challenge.id, -1.0),
        Err(Error::InvalidData(_))
    ));

    assert!(store.award_badge(1, BadgeKind::FirstStep).unwrap());
    assert!(!store.award_badge(1, BadgeKind::FirstStep).unwrap());
    assert!(store.award_badge(1, BadgeKind::HundredClub).unwrap());
    assert!(store.award_badge(2, BadgeKind::FirstStep).unwrap());

    let kinds: Vec<BadgeKind> = store
        .list_badges(1)
        .unwrap()
        .into_iter()
        .map(|b| b.kind)
        .collect();
    assert_eq!(kinds, vec![BadgeKind::FirstStep, BadgeKind::HundredClub]);
}

/// Contributions racing from several threads must all land
pub(crate) fn check_concurrent_challenge_contributions<S: Store + ?Sized>(store: &S) {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;

    let challenge = store
        .create_challenge(
            1,
            &NewChallenge {
                title: "Round-up jar".to_string(),
                target_amount: 1000.0,
            },
        )
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..PER_THREAD {
                    store.add_to_challenge(challenge.id, 1.0).unwrap();
                }
            });
        }
    });

    let stored = store.get_challenge(challenge.id).unwrap().unwrap();
    assert_eq!(stored.saved_amount, (THREADS * PER_THREAD) as f64);
    assert_eq!(stored.status, ChallengeStatus::Active);
}
