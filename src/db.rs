// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local SQLite store: the session and the last fetched snapshot of the
//! summary, expenses and incomes, used when the API is unreachable.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::{Session, SummaryReport, Transaction, TransactionKind};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendwise", "spendwise"));

const SESSION_KEY: &str = "session";
const SUMMARY_KEY: &str = "summary";
const SYNCED_AT_KEY: &str = "synced_at";

pub fn db_path(config: &Config) -> Result<PathBuf> {
    if let Some(p) = &config.database_path {
        return Ok(p.clone());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendwise.sqlite"))
}

pub fn open_or_init(config: &Config) -> Result<Connection> {
    let path = db_path(config)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "opened snapshot store");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        owner_id TEXT,
        amount TEXT NOT NULL,
        label TEXT NOT NULL,
        icon TEXT,
        occurred_on TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        PRIMARY KEY(kind, id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_recorded ON transactions(recorded_at);
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn delete_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

pub fn load_session(conn: &Connection) -> Result<Option<Session>> {
    match get_setting(conn, SESSION_KEY)? {
        Some(raw) => {
            let s = serde_json::from_str(&raw).context("Stored session is corrupt")?;
            Ok(Some(s))
        }
        None => Ok(None),
    }
}

pub fn save_session(conn: &Connection, session: &Session) -> Result<()> {
    set_setting(conn, SESSION_KEY, &serde_json::to_string(session)?)
}

/// Forget the session and every snapshot that belonged to it.
pub fn clear_session(conn: &Connection) -> Result<()> {
    delete_setting(conn, SESSION_KEY)?;
    delete_setting(conn, SUMMARY_KEY)?;
    delete_setting(conn, SYNCED_AT_KEY)?;
    conn.execute("DELETE FROM transactions", [])?;
    Ok(())
}

pub fn save_summary(conn: &Connection, raw: &Value) -> Result<()> {
    set_setting(conn, SUMMARY_KEY, &serde_json::to_string(raw)?)
}

/// The stored summary, decoded with the same per-field leniency as a live one.
pub fn load_summary(conn: &Connection) -> Result<Option<SummaryReport>> {
    let Some(raw) = get_setting(conn, SUMMARY_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(v) => Ok(Some(SummaryReport::from_value(&v))),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable summary snapshot");
            Ok(None)
        }
    }
}

pub fn mark_synced(conn: &Connection, at: DateTime<Utc>) -> Result<()> {
    set_setting(conn, SYNCED_AT_KEY, &at.to_rfc3339())
}

pub fn synced_at(conn: &Connection) -> Result<Option<DateTime<Utc>>> {
    Ok(get_setting(conn, SYNCED_AT_KEY)?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc)))
}

/// Replace every stored transaction of `kind` with `txs`.
pub fn replace_transactions(
    conn: &mut Connection,
    kind: TransactionKind,
    txs: &[Transaction],
) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM transactions WHERE kind=?1",
        params![kind.as_str()],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO transactions
                (id, kind, owner_id, amount, label, icon, occurred_on, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for t in txs {
            stmt.execute(params![
                t.id,
                kind.as_str(),
                t.owner_id,
                t.amount.to_string(),
                t.label,
                t.icon,
                t.occurred_on.to_string(),
                t.recorded_at.to_rfc3339(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Stored transactions of `kind`, newest occurrence first.
pub fn load_transactions(conn: &Connection, kind: TransactionKind) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, amount, label, icon, occurred_on, recorded_at
         FROM transactions WHERE kind=?1
         ORDER BY occurred_on DESC, recorded_at DESC",
    )?;
    let rows = stmt.query_map(params![kind.as_str()], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, owner_id, amount, label, icon, occurred_on, recorded_at) = row?;
        let amount = amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored amount '{}' for {}", amount, id))?;
        let occurred_on = NaiveDate::parse_from_str(&occurred_on, "%Y-%m-%d")
            .with_context(|| format!("Invalid stored date '{}' for {}", occurred_on, id))?;
        let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
            .with_context(|| format!("Invalid stored timestamp '{}' for {}", recorded_at, id))?
            .with_timezone(&Utc);
        out.push(Transaction {
            id,
            owner_id,
            amount,
            label,
            icon,
            occurred_on,
            recorded_at,
        });
    }
    Ok(out)
}
