// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

use crate::db;
use crate::models::{Transaction, TransactionKind};

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let kinds = match sub.get_one::<String>("kind") {
        Some(k) => vec![
            TransactionKind::parse(k)
                .ok_or_else(|| anyhow!("Unknown kind '{}' (use expense|income)", k.trim()))?,
        ],
        None => vec![TransactionKind::Expense, TransactionKind::Income],
    };
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let mut rows: Vec<(TransactionKind, Transaction)> = Vec::new();
    for kind in kinds {
        rows.extend(db::load_transactions(conn, kind)?.into_iter().map(|t| (kind, t)));
    }

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "kind", "label", "icon", "amount", "date", "created_at",
            ])?;
            for (kind, t) in &rows {
                let amount = t.amount.to_string();
                let date = t.occurred_on.to_string();
                let created = t.recorded_at.to_rfc3339();
                wtr.write_record([
                    t.id.as_str(),
                    kind.as_str(),
                    t.label.as_str(),
                    t.icon.as_deref().unwrap_or_default(),
                    amount.as_str(),
                    date.as_str(),
                    created.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = rows
                .iter()
                .map(|(kind, t)| {
                    json!({
                        "id": t.id, "kind": kind.as_str(), "label": t.label, "icon": t.icon,
                        "amount": t.amount.to_string(), "date": t.occurred_on.to_string(),
                        "created_at": t.recorded_at.to_rfc3339()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
