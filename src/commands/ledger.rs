// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `expense` and `income` subcommands. Both kinds share one handler; only
//! the label field (category vs source) and icon set differ.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::dashboard::totals::sum_amounts;
use crate::db;
use crate::models::{Transaction, TransactionKind};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::validation::NewTransaction;

pub fn handle(
    conn: &mut Connection,
    config: &Config,
    kind: TransactionKind,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, config, kind, sub)?,
        Some(("add", sub)) => add(conn, config, kind, sub)?,
        Some(("rm", sub)) => remove(conn, config, kind, sub)?,
        Some(("download", sub)) => download(conn, config, kind, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct LedgerRow {
    pub id: String,
    pub icon: String,
    pub label: String,
    pub amount: String,
    pub date: String,
    pub created: String,
}

impl From<&Transaction> for LedgerRow {
    fn from(t: &Transaction) -> Self {
        LedgerRow {
            id: t.id.clone(),
            icon: t.icon.clone().unwrap_or_default(),
            label: t.label.clone(),
            amount: format!("{:.2}", t.amount.round_dp(2)),
            date: t.occurred_on.format("%b %-d, %Y").to_string(),
            created: t.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Records of `kind`, from the API (refreshing the snapshot) or from the
/// snapshot when `offline` is set.
pub fn fetch_records(
    conn: &mut Connection,
    config: &Config,
    kind: TransactionKind,
    offline: bool,
) -> Result<Vec<Transaction>> {
    if offline {
        return db::load_transactions(conn, kind);
    }
    let records = super::authed_client(conn, config)?
        .list(kind)
        .with_context(|| format!("Failed to fetch {} records", kind.as_str()))?;
    db::replace_transactions(conn, kind, &records)?;
    Ok(records)
}

/// List rows, capped at `limit` when given.
pub fn ledger_rows(records: &[Transaction], limit: Option<usize>) -> Vec<LedgerRow> {
    records
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(LedgerRow::from)
        .collect()
}

fn list(
    conn: &mut Connection,
    config: &Config,
    kind: TransactionKind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let records = fetch_records(conn, config, kind, sub.get_flag("offline"))?;
    let data = ledger_rows(&records, sub.get_one::<usize>("limit").copied());
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let title = match kind {
            TransactionKind::Expense => "Total expenses",
            TransactionKind::Income => "Total income",
        };
        println!(
            "{}: {}  ({} entries)",
            title,
            fmt_money(&sum_amounts(&records)),
            records.len()
        );
        if records.is_empty() {
            println!("Nothing recorded yet. Add one with `spendwise {} add`.", kind.as_str());
            return Ok(());
        }
        let label_header = match kind {
            TransactionKind::Expense => "Category",
            TransactionKind::Income => "Source",
        };
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| vec![r.id, r.icon, r.label, r.amount, r.date, r.created])
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Icon", label_header, "Amount", "Date", "Created"], rows)
        );
    }
    Ok(())
}

/// Validated entry from `add` arguments; the date defaults to `today`.
pub fn new_transaction(
    kind: TransactionKind,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<NewTransaction> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    Ok(NewTransaction::validate(
        kind,
        sub.get_one::<String>("icon").unwrap(),
        sub.get_one::<String>("label").unwrap(),
        amount,
        date,
    )?)
}

fn add(
    conn: &mut Connection,
    config: &Config,
    kind: TransactionKind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let new = new_transaction(kind, sub, Local::now().date_naive())?;
    super::authed_client(conn, config)?
        .add(&new)
        .with_context(|| format!("Failed to add {}", kind.as_str()))?;
    tracing::info!(kind = kind.as_str(), label = %new.label, amount = %new.amount, "recorded");
    println!(
        "Recorded {} {} for '{}' on {}",
        kind.as_str(),
        fmt_money(&new.amount),
        new.label,
        new.date
    );
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn remove(
    conn: &mut Connection,
    config: &Config,
    kind: TransactionKind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    if !sub.get_flag("yes")
        && !confirm(&format!("Delete {} {}? This cannot be undone.", kind.as_str(), id))?
    {
        println!("Cancelled.");
        return Ok(());
    }
    super::authed_client(conn, config)?
        .delete(kind, &id)
        .with_context(|| format!("Failed to delete {} {}", kind.as_str(), id))?;
    conn.execute(
        "DELETE FROM transactions WHERE kind=?1 AND id=?2",
        rusqlite::params![kind.as_str(), id],
    )?;
    println!("Deleted {} {}", kind.as_str(), id);
    Ok(())
}

/// `expenses_2025-03-04.xlsx` / `incomes_2025-03-04.xlsx`.
pub fn default_download_name(kind: TransactionKind, today: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}s_{}.xlsx", kind.as_str(), today.format("%Y-%m-%d")))
}

fn download(
    conn: &mut Connection,
    config: &Config,
    kind: TransactionKind,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let out = sub
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_download_name(kind, Local::now().date_naive()));
    eprintln!("Preparing Excel file...");
    let bytes = super::authed_client(conn, config)?
        .download_excel(kind)
        .context("Failed to download Excel file")?;
    std::fs::write(&out, &bytes).with_context(|| format!("Write {}", out.display()))?;
    println!("Saved {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}
