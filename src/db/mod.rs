// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Data access layer.
//!
//! This module owns the SQLite database used as the local key-value store.
//! Values are opaque text, callers decide how to encode them.
//!
//! # Tables
//!
//! * `settings` - One row per key, holding the latest value written.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::entitlement::{PurchaseRecord, PurchaseStore, StoreError};

/// Opens a connection to the SQLite database and configures performance settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Durability**: Sets synchronous mode to `FULL`, a purchase must
///   survive a crash once it has been confirmed.
/// * **Schema**: Executes [`create_schema`] to ensure all tables exist.
///
/// # Arguments
///
/// * `path` - The file system path to the SQLite database file.
///
/// # Errors
///
/// Returns an error if:
/// * The database file cannot be opened.
/// * The initial PRAGMA configurations fail.
/// * The schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).context(format!("Failed to open database: {}", path))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch("PRAGMA synchronous = FULL;")?;

    create_schema(&conn)?;

    Ok(conn)
}

/// Create the database schema.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
    .context("Failed to create schema")
}

/// Fetches the value stored under `key`, if any.
pub(crate) fn get_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT value FROM settings WHERE key = ?1")?;
    stmt.query_row(params![key], |row| row.get(0)).optional()
}

/// Stores `value` under `key`, replacing any previous value.
pub(crate) fn set_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
    )?;
    stmt.execute(params![key, value])?;
    Ok(())
}

/// [`PurchaseStore`] backed by the `settings` table, records are kept as JSON.
pub(crate) struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl PurchaseStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<PurchaseRecord>, StoreError> {
        match get_value(&self.conn, key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, record: &PurchaseRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        set_value(&self.conn, key, &json)?;

        if get_value(&self.conn, key)?.as_deref() != Some(json.as_str()) {
            return Err(StoreError::Unavailable(format!("write to '{key}' was not persisted")));
        }
        Ok(())
    }
}
