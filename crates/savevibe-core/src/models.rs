//! Domain models for SaveVibe

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::insights::is_necessity;

/// Earliest year accepted for a month period
pub const MIN_YEAR: i32 = 1970;
/// Latest year accepted for a month period
pub const MAX_YEAR: i32 = 9999;

/// Reject non-finite and non-positive amounts
pub fn validate_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "{} must be a positive number, got {}",
            field, amount
        )));
    }
    Ok(())
}

/// Lower-cased, trimmed category label used for grouping and budget lookups
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// A calendar month, 1-indexed (January = 1)
///
/// Every month parameter in the system, from URL paths to store queries,
/// goes through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthPeriod {
    month: u32,
    year: i32,
    #[serde(skip)]
    start: NaiveDate,
    #[serde(skip)]
    end: NaiveDate,
}

impl MonthPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidData(format!(
                "year must be between {} and {}, got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }

        let invalid = || Error::InvalidData(format!("invalid month {}-{:02}", year, month));
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            month,
            year,
            start,
            end,
        })
    }

    /// The month a given date falls in
    pub fn containing(date: NaiveDate) -> Result<Self> {
        Self::new(date.month(), date.year())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// First day of the month (inclusive)
    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month (inclusive)
    pub fn last_day(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A logged transaction. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Always positive; direction is carried by `kind`
    pub amount: f64,
    /// Free text, compared case-insensitively
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub is_want: bool,
    pub merchant: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// A transaction to be stored (before an ID is assigned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    /// Derived from the category when not given
    #[serde(default)]
    pub is_want: Option<bool>,
    #[serde(default)]
    pub merchant: Option<String>,
}

impl NewTransaction {
    pub fn expense(amount: f64, category: &str, date: NaiveDate) -> Self {
        Self {
            amount,
            category: category.to_string(),
            description: String::new(),
            date,
            kind: TransactionType::Expense,
            is_want: None,
            merchant: None,
        }
    }

    pub fn income(amount: f64, category: &str, date: NaiveDate) -> Self {
        Self {
            kind: TransactionType::Income,
            ..Self::expense(amount, category, date)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount("amount", self.amount)?;
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("category must not be empty".to_string()));
        }
        MonthPeriod::containing(self.date)?;
        Ok(())
    }

    /// The want flag to persist: explicit value, or the inverse of the necessity table
    pub fn resolved_is_want(&self) -> bool {
        self.is_want.unwrap_or_else(|| !is_necessity(&self.category))
    }
}

/// Planned spending for one category in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    pub id: i64,
    pub user_id: i64,
    /// Normalized (lower-cased) category
    pub category: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetAllocation {
    pub category: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
}

impl NewBudgetAllocation {
    /// Validate and return the period this allocation applies to
    pub fn validate(&self) -> Result<MonthPeriod> {
        validate_amount("amount", self.amount)?;
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("category must not be empty".to_string()));
        }
        MonthPeriod::new(self.month, self.year)
    }
}

/// A user-defined savings target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Percent of the target reached, capped at 100
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        validate_amount("targetAmount", self.target_amount)?;
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Savings challenge status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for ChallengeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown challenge status: {}", s)),
        }
    }
}

/// A gamified savings challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub target_amount: f64,
    pub saved_amount: f64,
    pub status: ChallengeStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChallenge {
    pub title: String,
    pub target_amount: f64,
}

impl NewChallenge {
    pub fn validate(&self) -> Result<()> {
        validate_amount("targetAmount", self.target_amount)?;
        if self.title.trim().is_empty() {
            return Err(Error::InvalidData("title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Badges unlockable through challenges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    FirstStep,
    HundredClub,
    FiveHundredClub,
    Thousandaire,
    ChallengeChampion,
    SerialSaver,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 6] = [
        Self::FirstStep,
        Self::HundredClub,
        Self::FiveHundredClub,
        Self::Thousandaire,
        Self::ChallengeChampion,
        Self::SerialSaver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstStep => "first_step",
            Self::HundredClub => "hundred_club",
            Self::FiveHundredClub => "five_hundred_club",
            Self::Thousandaire => "thousandaire",
            Self::ChallengeChampion => "challenge_champion",
            Self::SerialSaver => "serial_saver",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstStep => "First Step",
            Self::HundredClub => "Hundred Club",
            Self::FiveHundredClub => "Five Hundred Club",
            Self::Thousandaire => "Thousandaire",
            Self::ChallengeChampion => "Challenge Champion",
            Self::SerialSaver => "Serial Saver",
        }
    }
}

impl std::str::FromStr for BadgeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown badge: {}", s))
    }
}

impl std::fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A badge held by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub user_id: i64,
    pub kind: BadgeKind,
    pub unlocked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_month_period_bounds() {
        let feb = MonthPeriod::new(2, 2024).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = MonthPeriod::new(12, 2023).unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(dec.contains(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()));
        assert!(dec.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert!(!dec.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }

    #[test]
    fn test_month_period_rejects_out_of_range() {
        assert!(matches!(MonthPeriod::new(0, 2024), Err(Error::InvalidData(_))));
        assert!(matches!(MonthPeriod::new(13, 2024), Err(Error::InvalidData(_))));
        assert!(matches!(MonthPeriod::new(6, 1969), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_new_transaction_defaults_want_from_category() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(!NewTransaction::expense(10.0, "Groceries", date).resolved_is_want());
        assert!(NewTransaction::expense(10.0, "Dining", date).resolved_is_want());

        let mut explicit = NewTransaction::expense(10.0, "Dining", date);
        explicit.is_want = Some(false);
        assert!(!explicit.resolved_is_want());
    }

    #[test]
    fn test_new_transaction_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(NewTransaction::expense(10.0, "food", date).validate().is_ok());
        assert!(NewTransaction::expense(0.0, "food", date).validate().is_err());
        assert!(NewTransaction::expense(-5.0, "food", date).validate().is_err());
        assert!(NewTransaction::expense(f64::NAN, "food", date).validate().is_err());
        assert!(NewTransaction::expense(10.0, "   ", date).validate().is_err());
    }

    #[test]
    fn test_transaction_type_json() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let tx = NewTransaction::income(2500.0, "salary", date);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["isWant"], serde_json::Value::Null);

        let parsed: NewTransaction = serde_json::from_value(serde_json::json!({
            "amount": 12.5,
            "category": "Coffee",
            "date": "2024-03-05"
        }))
        .unwrap();
        assert_eq!(parsed.kind, TransactionType::Expense);
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_goal_progress_capped() {
        let goal = SavingsGoal {
            id: 1,
            user_id: 1,
            name: "Trip".to_string(),
            target_amount: 200.0,
            current_amount: 250.0,
            deadline: None,
            created_at: Utc::now(),
        };
        assert_eq!(goal.progress_percent(), 100.0);
        assert!(goal.is_reached());
    }

    #[test]
    fn test_badge_kind_round_trip_names() {
        for kind in BadgeKind::ALL {
            assert_eq!(BadgeKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(BadgeKind::from_str("gold_star").is_err());
    }
}
