//! SQLite-backed usage store.
//!
//! Holds the two counters the service gates on: per-device free trial
//! records and purchased generation tokens. Every read-modify-write runs
//! inside one `IMMEDIATE` transaction so concurrent requests for the same
//! key cannot both observe "not yet exhausted".
//!
//! `rusqlite` is blocking; async callers go through [`UsageStore`] which
//! moves each operation onto the blocking thread pool.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{AppError, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS free_trial_tracking (
    device_id TEXT PRIMARY KEY,
    uses_count INTEGER NOT NULL DEFAULT 0 CHECK (uses_count >= 0),
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);
CREATE TABLE IF NOT EXISTS generation_tokens (
    token TEXT PRIMARY KEY,
    remaining_generations INTEGER NOT NULL CHECK (remaining_generations >= 0),
    expires_at INTEGER,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);
";

/// A per-device free trial row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub device_id: String,
    pub uses_count: u32,
}

/// A purchased token row. Issued by the payment side, only decremented here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationToken {
    pub token: String,
    pub remaining_generations: u32,
    /// Unix seconds; `None` never expires.
    pub expires_at: Option<i64>,
}

/// Result of an attempt to consume one free trial use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialConsumption {
    /// First use for this device; record created with `uses_count = 1`.
    Created,
    /// Existing record incremented to `uses_count`.
    Incremented { uses_count: u32 },
    /// Record already at the limit; nothing changed.
    Exhausted { uses_count: u32 },
}

/// Shared handle to the SQLite usage database.
#[derive(Clone)]
pub struct UsageStore {
    conn: Arc<Mutex<Connection>>,
}

impl UsageStore {
    /// Open (or create) the database file and ensure the tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        // WAL keeps readers (trial status) off the writer's lock
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        info!(path = %path.display(), "Usage store opened");
        Self::from_connection(conn)
    }

    /// Private in-memory database, for tests and local experiments.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Store task failed: {}", e)))?
    }

    /// Current trial record for a device, if any.
    pub async fn trial_record(&self, device_id: &str) -> Result<Option<TrialRecord>> {
        let device_id = device_id.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT device_id, uses_count FROM free_trial_tracking WHERE device_id = ?1",
                [&device_id],
                |row| {
                    Ok(TrialRecord {
                        device_id: row.get(0)?,
                        uses_count: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(AppError::from)
        })
        .await
    }

    /// Atomically consume one free trial use for `device_id` if below `limit`.
    pub async fn consume_trial(&self, device_id: &str, limit: u32) -> Result<TrialConsumption> {
        let device_id = device_id.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current: Option<u32> = tx
                .query_row(
                    "SELECT uses_count FROM free_trial_tracking WHERE device_id = ?1",
                    [&device_id],
                    |row| row.get(0),
                )
                .optional()?;

            let outcome = match current {
                None => {
                    tx.execute(
                        "INSERT INTO free_trial_tracking (device_id, uses_count) VALUES (?1, 1)",
                        [&device_id],
                    )?;
                    TrialConsumption::Created
                }
                Some(uses_count) if uses_count < limit => {
                    tx.execute(
                        "UPDATE free_trial_tracking
                         SET uses_count = uses_count + 1, updated_at = strftime('%s', 'now')
                         WHERE device_id = ?1",
                        [&device_id],
                    )?;
                    TrialConsumption::Incremented {
                        uses_count: uses_count + 1,
                    }
                }
                Some(uses_count) => TrialConsumption::Exhausted { uses_count },
            };

            tx.commit()?;
            debug!(device_id = %device_id, ?outcome, "Trial consumption committed");
            Ok(outcome)
        })
        .await
    }

    /// Atomically take one generation from `token`.
    ///
    /// Returns the remaining count after the decrement, or `None` when the
    /// token is unknown, expired or exhausted (nothing is changed then).
    pub async fn consume_token(&self, token: &str, now: i64) -> Result<Option<u32>> {
        let token = token.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let changed = tx.execute(
                "UPDATE generation_tokens
                 SET remaining_generations = remaining_generations - 1
                 WHERE token = ?1
                   AND remaining_generations > 0
                   AND (expires_at IS NULL OR expires_at > ?2)",
                params![token, now],
            )?;

            let remaining = if changed == 1 {
                let remaining: u32 = tx.query_row(
                    "SELECT remaining_generations FROM generation_tokens WHERE token = ?1",
                    [&token],
                    |row| row.get(0),
                )?;
                Some(remaining)
            } else {
                None
            };

            tx.commit()?;
            Ok(remaining)
        })
        .await
    }

    /// Look up a token without consuming it.
    pub async fn token(&self, token: &str) -> Result<Option<GenerationToken>> {
        let token = token.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT token, remaining_generations, expires_at
                 FROM generation_tokens WHERE token = ?1",
                [&token],
                |row| {
                    Ok(GenerationToken {
                        token: row.get(0)?,
                        remaining_generations: row.get(1)?,
                        expires_at: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(AppError::from)
        })
        .await
    }

    /// Insert or replace a token row.
    ///
    /// Token issuance lives with the payment service; this is the write path
    /// it (and the test suite) uses against the shared database.
    pub async fn upsert_token(&self, token: GenerationToken) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO generation_tokens (token, remaining_generations, expires_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(token) DO UPDATE SET
                    remaining_generations = excluded.remaining_generations,
                    expires_at = excluded.expires_at",
                params![token.token, token.remaining_generations, token.expires_at],
            )?;
            Ok(())
        })
        .await
    }
}
