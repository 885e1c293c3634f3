//! Storage layer for the baby tracker.
//!
//! Persists tracker state slices using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization such as a `Mutex<Database>`.
//!
//! # Schema
//!
//! One row per `(owner, slice)`. The anonymous owner is stored as the empty
//! string; signed-in owners use their user id.
//!
//! ## Timestamp Format
//!
//! `updated_at` is stored as TEXT in RFC 3339 format with millisecond precision
//! (e.g., `2024-01-15T10:30:00.000Z`), so lexicographic ordering matches
//! chronological ordering.
//!
//! ## Slice Payload Storage
//!
//! The `data` column holds the slice exactly as serialized by `bt-core`
//! (camelCase JSON, timestamps as epoch milliseconds). Unknown fields are
//! ignored on load and legacy field names are accepted, so older payloads
//! keep loading without a migration.
//!
//! Legacy payloads are normalized the first time their slice is written
//! back: aliased fields (`type`, `storage`, `timestamp`) take their current
//! names, kinds are lowercased and whole-number volumes gain a fraction
//! (`240` becomes `240.0`). From then on a load followed by a save leaves
//! the stored bytes unchanged.

use std::path::Path;

use bt_core::state::SliceParseError;
use bt_core::{Owner, Slice, SliceUpdate, Snapshot, StateStore, UserId, ValidationError};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A slice could not be serialized for storage.
    #[error("failed to serialize slice: {0}")]
    Serialize(#[from] serde_json::Error),
    /// A stored slice payload could not be parsed.
    #[error(transparent)]
    SliceData(#[from] SliceParseError),
    /// A stored owner key is not a valid user id.
    #[error("invalid owner: {0}")]
    InvalidOwner(#[from] ValidationError),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {owner}: {timestamp}")]
    TimestampParse {
        owner: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- slices table: one JSON payload per owner and slice
            -- owner: user id, or '' for anonymous data
            -- slice: 'logs', 'growth', 'timer', 'profile' or 'inventory'
            CREATE TABLE IF NOT EXISTS slices (
                owner TEXT NOT NULL,
                slice TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (owner, slice)
            );

            CREATE INDEX IF NOT EXISTS idx_slices_updated ON slices(updated_at);
            ",
        )?;
        Ok(())
    }

    /// Raw payloads stored for `owner`, keyed by slice.
    ///
    /// Rows with an unrecognized slice name are skipped.
    fn raw_slices(&self, owner: &Owner) -> Result<Vec<(Slice, String)>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT slice, data FROM slices WHERE owner = ?1 ORDER BY slice")?;
        let rows = stmt.query_map(params![owner.key()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut slices = Vec::new();
        for row in rows {
            let (name, data) = row?;
            match name.parse::<Slice>() {
                Ok(slice) => slices.push((slice, data)),
                Err(err) => tracing::warn!(%owner, %err, "skipping unknown slice"),
            }
        }
        Ok(slices)
    }

    /// Every owner with stored data. Anonymous data sorts first.
    pub fn owners(&self) -> Result<Vec<Owner>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT owner FROM slices ORDER BY owner ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut owners = Vec::new();
        for row in rows {
            let key = row?;
            let owner = if key.is_empty() {
                Owner::Anonymous
            } else {
                Owner::User(UserId::new(key)?)
            };
            owners.push(owner);
        }
        Ok(owners)
    }

    /// When any of `owner`'s slices was last written.
    pub fn last_updated(&self, owner: &Owner) -> Result<Option<DateTime<Utc>>, DbError> {
        let timestamp: Option<String> = self
            .conn
            .query_row(
                "SELECT MAX(updated_at) FROM slices WHERE owner = ?1",
                params![owner.key()],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        timestamp
            .map(|timestamp| parse_timestamp(&timestamp, owner))
            .transpose()
    }

    fn save_slice_at(
        &self,
        owner: &Owner,
        update: SliceUpdate<'_>,
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let slice = update.slice();
        match update.to_json()? {
            Some(data) => {
                self.conn.execute(
                    "
                    INSERT INTO slices (owner, slice, data, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(owner, slice) DO UPDATE SET
                        data = excluded.data,
                        updated_at = excluded.updated_at
                    ",
                    params![owner.key(), slice.as_str(), data, format_timestamp(now)],
                )?;
            }
            None => {
                self.conn.execute(
                    "DELETE FROM slices WHERE owner = ?1 AND slice = ?2",
                    params![owner.key(), slice.as_str()],
                )?;
            }
        }
        tracing::debug!(%owner, %slice, "saved slice");
        Ok(())
    }

    fn migrate_anonymous_at(&mut self, user: &UserId, now: DateTime<Utc>) -> Result<usize, DbError> {
        let anonymous = Owner::Anonymous;
        let slices = self.raw_slices(&anonymous)?;
        if slices.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut upsert = tx.prepare(
                "
                INSERT INTO slices (owner, slice, data, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(owner, slice) DO UPDATE SET
                    data = excluded.data,
                    updated_at = excluded.updated_at
                ",
            )?;
            let mut remove = tx.prepare("DELETE FROM slices WHERE owner = ?1 AND slice = ?2")?;
            let updated_at = format_timestamp(now);
            for (slice, data) in &slices {
                upsert.execute(params![user.as_str(), slice.as_str(), data, updated_at])?;
                remove.execute(params![anonymous.key(), slice.as_str()])?;
            }
        }
        tx.commit()?;

        tracing::debug!(%user, moved = slices.len(), "migrated anonymous data");
        Ok(slices.len())
    }
}

impl StateStore for Database {
    type Error = DbError;

    fn load(&self, owner: &Owner) -> Result<Snapshot, DbError> {
        let slices = self.raw_slices(owner)?;
        let snapshot =
            Snapshot::from_slices(slices.iter().map(|(slice, data)| (*slice, data.as_str())))?;
        Ok(snapshot)
    }

    fn save_slice(&mut self, owner: &Owner, update: SliceUpdate<'_>) -> Result<(), DbError> {
        self.save_slice_at(owner, update, Utc::now())
    }

    /// Moves every anonymous slice under `user` in one transaction. Slices the
    /// user already has are overwritten by the anonymous copy.
    fn migrate_anonymous(&mut self, user: &UserId) -> Result<usize, DbError> {
        self.migrate_anonymous_at(user, Utc::now())
    }
}

fn parse_timestamp(timestamp: &str, owner: &Owner) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            owner: owner.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
