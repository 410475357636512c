//! Command implementations for the SaveVibe CLI
//!
//! Each submodule contains related command implementations:
//! - `core` - Database opening and init
//! - `transactions` - Logging and listing transactions
//! - `budgets` / `alerts` - Monthly budgets and overspend alerts
//! - `insights` - Spending classification
//! - `serve` - Web server

pub mod alerts;
pub mod budgets;
pub mod core;
pub mod insights;
pub mod serve;
pub mod transactions;

pub use alerts::*;
pub use budgets::*;
pub use core::*;
pub use insights::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
