// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use super::dashboard::Inputs;
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::config::Config;
use crate::db;
use crate::models::{SummaryReport, TransactionKind};

pub fn handle(conn: &mut Connection, config: &Config) -> Result<()> {
    let inputs = fetch_and_store(conn, config)?;
    println!(
        "Synced {} expenses, {} incomes{}.",
        inputs.expenses.len(),
        inputs.incomes.len(),
        if inputs.summary.is_some() { " and the dashboard summary" } else { "" }
    );
    Ok(())
}

/// Unauthorized aborts; any other failure is reported and that input is
/// treated as absent.
fn soften<T>(what: &str, r: ApiResult<T>) -> Result<Option<T>> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch {}", what);
            eprintln!("Failed to fetch {}", what);
            Ok(None)
        }
    }
}

/// Fetch the summary, expenses and incomes, store whatever arrived, and
/// return it as dashboard inputs.
pub fn fetch_and_store(conn: &mut Connection, config: &Config) -> Result<Inputs> {
    let client: ApiClient = super::authed_client(conn, config)?;

    let expenses = soften("expenses", client.list(TransactionKind::Expense))?;
    let incomes = soften("income data", client.list(TransactionKind::Income))?;
    let summary_raw = soften("dashboard summary", client.summary_raw())?;

    if let Some(e) = &expenses {
        db::replace_transactions(conn, TransactionKind::Expense, e)?;
    }
    if let Some(i) = &incomes {
        db::replace_transactions(conn, TransactionKind::Income, i)?;
    }
    if let Some(raw) = &summary_raw {
        db::save_summary(conn, raw)?;
    }
    if expenses.is_some() || incomes.is_some() || summary_raw.is_some() {
        db::mark_synced(conn, Utc::now())?;
    }

    Ok(Inputs {
        summary: summary_raw.as_ref().map(SummaryReport::from_value),
        expenses: expenses.unwrap_or_default(),
        incomes: incomes.unwrap_or_default(),
    })
}
