// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::fmt::Write;

use crate::config::Config;
use crate::dashboard::{classify, CategoryGroup, DashboardView};
use crate::db;
use crate::models::{SummaryReport, Transaction, TransactionKind};
use crate::utils::{fmt_money, fmt_money_grouped, pretty_table, progress_bar, relative_day};

const BAR_WIDTH: usize = 24;

/// The three derivation inputs as of one fetch.
#[derive(Debug, Default)]
pub struct Inputs {
    pub summary: Option<SummaryReport>,
    pub expenses: Vec<Transaction>,
    pub incomes: Vec<Transaction>,
}

pub fn load_snapshot(conn: &Connection) -> Result<Inputs> {
    Ok(Inputs {
        summary: db::load_summary(conn)?,
        expenses: db::load_transactions(conn, TransactionKind::Expense)?,
        incomes: db::load_transactions(conn, TransactionKind::Income)?,
    })
}

pub fn handle(conn: &mut Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let inputs = if sub.get_flag("offline") {
        load_snapshot(conn)?
    } else {
        super::sync::fetch_and_store(conn, config)?
    };
    let view = DashboardView::derive(inputs.summary.as_ref(), &inputs.expenses, &inputs.incomes);
    if sub.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render(&view, Local::now().date_naive()));
    }
    Ok(())
}

fn breakdown_section(
    out: &mut String,
    title: &str,
    groups: &[CategoryGroup],
    total: &str,
    empty: &str,
) {
    let _ = writeln!(out, "\n{}", title);
    if groups.is_empty() {
        let _ = writeln!(out, "  {}", empty);
    } else {
        let width = groups.iter().map(|g| g.label.chars().count()).max().unwrap_or(0);
        for g in groups {
            let _ = writeln!(
                out,
                "  {:<width$}  {} {:>3}%  {:>12}  [{}]",
                g.label,
                progress_bar(g.percentage_of_period, BAR_WIDTH),
                g.percentage_of_period,
                fmt_money(&g.total_amount),
                g.classification.kind.glyph(),
                width = width
            );
        }
    }
    let _ = writeln!(out, "  Total: {}", total);
}

/// Plain-text rendering of a derived dashboard.
pub fn render(view: &DashboardView, today: NaiveDate) -> String {
    let mut out = String::new();
    let t = &view.totals;
    let cards = vec![
        vec!["Total Balance".to_string(), fmt_money(&t.total_balance)],
        vec!["Total Income".to_string(), fmt_money(&t.total_income)],
        vec!["Total Expense".to_string(), fmt_money(&t.total_expense)],
    ];
    let _ = writeln!(out, "{}", pretty_table(&["Overview", "Amount"], cards));

    let _ = writeln!(out, "\nRecent Transactions");
    if view.recent.is_empty() {
        let _ = writeln!(out, "  No transactions yet.");
    } else {
        let rows: Vec<Vec<String>> = view
            .recent
            .iter()
            .map(|r| {
                let c = classify(&r.label, r.icon.as_deref());
                let sign = match r.kind {
                    TransactionKind::Income => "+",
                    TransactionKind::Expense => "-",
                };
                vec![
                    format!("[{}] {}", c.kind.glyph(), r.label),
                    relative_day(r.recorded_at.date_naive(), today),
                    r.transaction_date.format("%b %-d, %Y").to_string(),
                    format!("{}{}", sign, fmt_money(&r.amount)),
                ]
            })
            .collect();
        let headers = ["Transaction", "When", "Date", "Amount"];
        let _ = writeln!(out, "{}", pretty_table(&headers, rows));
    }

    breakdown_section(
        &mut out,
        "Last 30 Days Expenses",
        &view.expenses_by_category,
        &fmt_money(&view.last_30_days_expense_total),
        "No expenses in the last 30 days.",
    );
    breakdown_section(
        &mut out,
        "Last 60 Days Income",
        &view.income_by_source,
        &fmt_money(&view.last_60_days_income_total),
        "No income in the last 60 days.",
    );
    let _ = writeln!(out, "\nNet balance: {}", fmt_money_grouped(&t.total_balance));
    out
}
