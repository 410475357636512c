//! SaveVibe CLI - Personal finance tracker
//!
//! Usage:
//!   savevibe init                                  Initialize database
//!   savevibe add --amount 12.50 --category coffee   Log a transaction
//!   savevibe classify --month 3 --year 2024        Classify a month of spending
//!   savevibe serve --port 3000                     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            memory,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                memory,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Add {
            amount,
            category,
            description,
            date,
            income,
            merchant,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let entry = commands::TransactionEntry {
                amount,
                category,
                description,
                date,
                income,
                merchant,
            };
            commands::cmd_add(&db, cli.user, entry)
        }
        Commands::Transactions { month, year } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let period = month.zip(year);
            commands::cmd_transactions_list(&db, cli.user, period)
        }
        Commands::Classify { month, year, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_classify(&db, cli.user, month, year, json)
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                BudgetAction::Set {
                    category,
                    amount,
                    month,
                    year,
                } => commands::cmd_budget_set(&db, cli.user, &category, amount, month, year),
                BudgetAction::List { month, year } => {
                    commands::cmd_budget_list(&db, cli.user, month, year)
                }
            }
        }
        Commands::Alerts { month, year } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_alerts(&db, cli.user, month, year)
        }
    }
}
