//! SQLite storage with connection pooling and migrations
//!
//! `Database` implements every store trait. This module is organized by domain:
//! - `transactions` - Transaction log
//! - `budgets` - Monthly budget allocations
//! - `goals` - Savings goals
//! - `challenges` - Challenges and badges

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use argon2::Argon2;
use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::{Error, Result};

mod budgets;
mod challenges;
mod goals;
mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "SAVEVIBE_DB_KEY";

/// Fixed so a passphrase maps to the same key for every database file.
/// Changing it locks out existing encrypted databases.
const KEY_SALT: &[u8] = b"savevibe-salt-v1";

const POOL_SIZE: u32 = 10;

/// Layout of SQLite's CURRENT_TIMESTAMP
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Stretch a passphrase into a 256-bit SQLCipher key, hex encoded
fn derive_key(passphrase: &str) -> Result<String> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), KEY_SALT, &mut key)
        .map_err(|e| Error::Encryption(format!("Key derivation failed: {}", e)))?;
    Ok(hex::encode(key))
}

pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, SQLITE_DATETIME)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(SQLITE_DATETIME).to_string()
}

/// Deletes a throwaway database and its WAL sidecars when the last handle goes
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// SQLite-backed store with connection pooling
#[derive(Clone)]
pub struct Database {
    // Declared before `scratch` so pooled connections close before the file goes
    pool: DbPool,
    scratch: Option<Arc<ScratchFile>>,
}

impl Database {
    /// Open an encrypted database keyed from `SAVEVIBE_DB_KEY`
    pub fn new(path: &str) -> Result<Self> {
        let passphrase = std::env::var(DB_KEY_ENV).map_err(|_| {
            Error::Encryption(format!(
                "{} is not set; export a passphrase or pass --no-encrypt",
                DB_KEY_ENV
            ))
        })?;
        Self::new_with_key(path, Some(&passphrase))
    }

    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let mut manager = SqliteConnectionManager::file(path);
        if let Some(passphrase) = passphrase {
            let pragma = format!("PRAGMA key = \"x'{}'\";", derive_key(passphrase)?);
            manager = manager.with_init(move |conn| conn.execute_batch(&pragma));
        }

        let db = Self {
            pool: Pool::builder().max_size(POOL_SIZE).build(manager)?,
            scratch: None,
        };
        db.run_migrations()?;
        debug!(path, encrypted = passphrase.is_some(), "Database opened");
        Ok(db)
    }

    /// Unencrypted database in the temp dir, deleted once dropped
    ///
    /// A plain `:memory:` database would give every pooled connection its own
    /// empty copy.
    pub fn in_memory() -> Result<Self> {
        static NEXT: AtomicU64 = AtomicU64::new(0);

        let path = std::env::temp_dir().join(format!(
            "savevibe-scratch-{}-{}.db",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        let scratch = ScratchFile(path);
        // Leftovers from an earlier process with the same pid
        scratch.remove();

        let path_str = scratch
            .0
            .to_str()
            .ok_or_else(|| Error::Storage("temp dir path is not valid UTF-8".to_string()))?;
        let mut db = Self::new_unencrypted(path_str)?;
        db.scratch = Some(Arc::new(scratch));
        Ok(db)
    }

    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Transactions (append-only money movements)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date DATE NOT NULL,
                type TEXT NOT NULL DEFAULT 'expense',     -- income, expense
                is_want BOOLEAN NOT NULL DEFAULT 0,
                merchant TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);

            -- Budget allocations (one row per user, category and month)
            CREATE TABLE IF NOT EXISTS budget_allocations (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,                   -- normalized (lower-case)
                amount REAL NOT NULL,
                month INTEGER NOT NULL,                   -- 1-12
                year INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, category, month, year)
            );

            -- Savings goals
            CREATE TABLE IF NOT EXISTS savings_goals (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                deadline DATE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_savings_goals_user ON savings_goals(user_id);

            -- Savings challenges
            CREATE TABLE IF NOT EXISTS challenges (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                target_amount REAL NOT NULL,
                saved_amount REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'active',    -- active, completed
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                completed_at DATETIME
            );

            CREATE INDEX IF NOT EXISTS idx_challenges_user ON challenges(user_id);

            -- Badges (each held at most once per user)
            CREATE TABLE IF NOT EXISTS badges (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                badge TEXT NOT NULL,
                unlocked_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, badge)
            );
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
