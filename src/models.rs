// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::parse_api_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Name of the free-text field the server uses for this kind.
    pub fn label_field(&self) -> &'static str {
        match self {
            TransactionKind::Income => "source",
            TransactionKind::Expense => "category",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

/// An expense or income record as returned by the API. `label` holds the
/// category for expenses and the source for incomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub owner_id: Option<String>,
    pub amount: Decimal,
    pub label: String,
    pub icon: Option<String>,
    pub occurred_on: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    source: Option<String>,
    amount: Decimal,
    date: String,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Decode one server record. Returns `None` when a required field is
    /// missing or malformed.
    pub fn from_wire(v: &Value) -> Option<Self> {
        let w: WireTransaction = serde_json::from_value(v.clone()).ok()?;
        let occurred_on = parse_api_date(&w.date).ok()?;
        let label = w
            .category
            .filter(|s| !s.trim().is_empty())
            .or(w.source)
            .unwrap_or_default();
        Some(Transaction {
            id: w.id,
            owner_id: w.user_id,
            amount: w.amount,
            label,
            icon: w.icon.filter(|s| !s.is_empty()),
            occurred_on,
            recorded_at: w.created_at,
        })
    }
}

/// One entry of a period window. Only the amount is required; grouping
/// needs nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodEntry {
    pub id: Option<String>,
    pub label: String,
    pub amount: Decimal,
}

impl PeriodEntry {
    pub fn from_wire(v: &Value) -> Option<Self> {
        let amount = decimal_field(v, "amount")?;
        let text = |key: &str| {
            v.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        Some(PeriodEntry {
            id: text("_id"),
            label: text("category").or_else(|| text("source")).unwrap_or_default(),
            amount,
        })
    }
}

/// A server-side aggregate over a trailing window of days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodWindow {
    pub total: Option<Decimal>,
    pub transactions: Option<Vec<PeriodEntry>>,
}

/// One row of recent activity, either from the summary or derived locally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub id: String,
    pub kind: TransactionKind,
    pub label: String,
    pub icon: Option<String>,
    pub amount: Decimal,
    pub transaction_date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn from_expense(t: &Transaction) -> Self {
        ActivityRecord {
            id: t.id.clone(),
            kind: TransactionKind::Expense,
            label: t.label.clone(),
            icon: None,
            amount: t.amount,
            transaction_date: t.occurred_on,
            recorded_at: t.recorded_at,
        }
    }

    /// Decode a `recentTransactions` entry. Entries without a recognizable
    /// `type` are treated as expenses.
    pub fn from_wire(v: &Value) -> Option<Self> {
        let t = Transaction::from_wire(v)?;
        let kind = v
            .get("type")
            .and_then(Value::as_str)
            .and_then(TransactionKind::parse)
            .unwrap_or(TransactionKind::Expense);
        let label = if t.label.trim().is_empty() {
            "Transaction".to_string()
        } else {
            t.label
        };
        Some(ActivityRecord {
            id: t.id,
            kind,
            label,
            icon: t.icon,
            amount: t.amount,
            transaction_date: t.occurred_on,
            recorded_at: t.recorded_at,
        })
    }
}

/// Server-computed dashboard bundle. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_balance: Option<Decimal>,
    pub total_income: Option<Decimal>,
    pub total_expenses: Option<Decimal>,
    pub last_30_days_expenses: Option<PeriodWindow>,
    pub last_60_days_income: Option<PeriodWindow>,
    pub recent_transactions: Option<Vec<ActivityRecord>>,
}

fn decimal_field(v: &Value, key: &str) -> Option<Decimal> {
    let raw = v.get(key)?;
    if raw.is_null() {
        return None;
    }
    serde_json::from_value(raw.clone()).ok()
}

fn records<T>(raw: &Value, what: &str, decode: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    let items = raw.as_array()?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match decode(item) {
            Some(t) => out.push(t),
            None => tracing::warn!(entry = %item, "skipping malformed {} entry", what),
        }
    }
    Some(out)
}

fn window_field(v: &Value, key: &str) -> Option<PeriodWindow> {
    let raw = v.get(key)?;
    if !raw.is_object() {
        return None;
    }
    Some(PeriodWindow {
        total: decimal_field(raw, "total"),
        transactions: raw
            .get("transactions")
            .and_then(|t| records(t, key, PeriodEntry::from_wire)),
    })
}

impl SummaryReport {
    /// Decode the `/dashboard` document field by field so a bad field only
    /// drops that field.
    pub fn from_value(v: &Value) -> Self {
        SummaryReport {
            total_balance: decimal_field(v, "totalBalance"),
            total_income: decimal_field(v, "totalIncome"),
            total_expenses: decimal_field(v, "totalExpenses"),
            last_30_days_expenses: window_field(v, "last30DaysExpenses"),
            last_60_days_income: window_field(v, "last60DaysIncome"),
            recent_transactions: v
                .get("recentTransactions")
                .and_then(|r| records(r, "recentTransactions", ActivityRecord::from_wire)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Authentication context handed to the API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}
