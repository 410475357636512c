//! Core utilities: database opening, init

use std::path::Path;

use anyhow::{Context, Result};
use savevibe_core::Database;
use tracing::info;

/// Convert a database path to the string form the core expects
fn db_path_str(db_path: &Path) -> Result<&str> {
    db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))
}

/// Open database with encryption setting
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path = db_path_str(db_path)?;
    if no_encrypt {
        Database::new_unencrypted(path).context("Failed to open database")
    } else {
        Database::new(path).context("Failed to open database (is SAVEVIBE_DB_KEY set?)")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let transactions = db.count_transactions()?;
    info!(path = %db_path.display(), encrypted = !no_encrypt, transactions, "Database initialized");

    println!("✅ Database initialized ({} transaction(s) on record)", transactions);
    if no_encrypt {
        println!("   ⚠️  Encryption disabled");
    } else {
        println!("   🔐 Encrypted with SQLCipher");
    }

    Ok(())
}
