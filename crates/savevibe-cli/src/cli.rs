//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// SaveVibe - Track spending, budgets and savings
#[derive(Parser)]
#[command(name = "savevibe")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "savevibe.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SAVEVIBE_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// User ID to act as
    #[arg(long, default_value = "1", global = true)]
    pub user: i64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a bearer key from SAVEVIBE_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Keep all data in memory instead of the database (lost on exit)
        #[arg(long)]
        memory: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Log a transaction
    Add {
        /// Amount (positive)
        #[arg(short, long)]
        amount: f64,

        /// Category (e.g. groceries, dining)
        #[arg(short, long)]
        category: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Record as income instead of an expense
        #[arg(long)]
        income: bool,

        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
    },

    /// List transactions
    Transactions {
        /// Month (1-12); requires --year
        #[arg(long, requires = "year")]
        month: Option<u32>,

        /// Year; requires --month
        #[arg(long, requires = "month")]
        year: Option<i32>,
    },

    /// Classify a month of spending into necessities, wants and savings
    Classify {
        /// Month (1-12)
        #[arg(long)]
        month: u32,

        /// Year
        #[arg(long)]
        year: i32,

        /// Print the raw classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage monthly budgets
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Show budget alerts for a month
    Alerts {
        /// Month (1-12)
        #[arg(long)]
        month: u32,

        /// Year
        #[arg(long)]
        year: i32,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set (or replace) a category budget
    Set {
        /// Category
        #[arg(short, long)]
        category: String,

        /// Budgeted amount
        #[arg(short, long)]
        amount: f64,

        /// Month (1-12)
        #[arg(long)]
        month: u32,

        /// Year
        #[arg(long)]
        year: i32,
    },

    /// List budgets for a month
    List {
        /// Month (1-12)
        #[arg(long)]
        month: u32,

        /// Year
        #[arg(long)]
        year: i32,
    },
}
