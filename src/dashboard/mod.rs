// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derivation of everything the dashboard shows from the summary report and
//! the raw expense/income lists. All functions here are total: missing data
//! degrades to a local fallback, never to an error.

pub mod breakdown;
pub mod classify;
pub mod recent;
pub mod totals;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ActivityRecord, PeriodWindow, SummaryReport, Transaction};
pub use breakdown::{CategoryGroup, Labeled, group_by_label, percentage_of};
pub use classify::{CategoryKind, Classification, classify};
pub use recent::{RECENT_LIMIT, select_recent};
pub use totals::{Totals, reconcile};

fn window_groups(window: Option<&PeriodWindow>) -> Vec<CategoryGroup> {
    let Some(window) = window else {
        return Vec::new();
    };
    match &window.transactions {
        Some(txs) => group_by_label(txs, window.total.unwrap_or(Decimal::ZERO)),
        None => Vec::new(),
    }
}

fn window_total(window: Option<&PeriodWindow>) -> Decimal {
    window.and_then(|w| w.total).unwrap_or(Decimal::ZERO)
}

/// Expenses over the summary's 30-day window, grouped by category.
pub fn expenses_by_category(summary: Option<&SummaryReport>) -> Vec<CategoryGroup> {
    window_groups(summary.and_then(|s| s.last_30_days_expenses.as_ref()))
}

/// Incomes over the summary's 60-day window, grouped by source.
pub fn income_by_source(summary: Option<&SummaryReport>) -> Vec<CategoryGroup> {
    window_groups(summary.and_then(|s| s.last_60_days_income.as_ref()))
}

/// One derivation pass over the three dashboard inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub totals: Totals,
    pub recent: Vec<ActivityRecord>,
    pub expenses_by_category: Vec<CategoryGroup>,
    pub income_by_source: Vec<CategoryGroup>,
    pub last_30_days_expense_total: Decimal,
    pub last_60_days_income_total: Decimal,
}

impl DashboardView {
    pub fn derive(
        summary: Option<&SummaryReport>,
        expenses: &[Transaction],
        incomes: &[Transaction],
    ) -> Self {
        DashboardView {
            totals: reconcile(summary, expenses, incomes),
            recent: select_recent(summary, expenses),
            expenses_by_category: expenses_by_category(summary),
            income_by_source: income_by_source(summary),
            last_30_days_expense_total: window_total(
                summary.and_then(|s| s.last_30_days_expenses.as_ref()),
            ),
            last_60_days_income_total: window_total(
                summary.and_then(|s| s.last_60_days_income.as_ref()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    fn tx(id: &str, label: &str, amount: i64, minute: u32) -> Transaction {
        Transaction {
            id: id.into(),
            owner_id: None,
            amount: Decimal::from(amount),
            label: label.into(),
            icon: None,
            occurred_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            recorded_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn no_summary_uses_local_sums() {
        let expenses = vec![tx("a", "Food", 50, 0), tx("b", "Food", 30, 1)];
        let view = DashboardView::derive(None, &expenses, &[]);
        assert_eq!(view.totals.total_expense, Decimal::from(80));
        assert_eq!(view.totals.total_income, Decimal::ZERO);
        assert_eq!(view.totals.total_balance, Decimal::from(-80));

        let groups = group_by_label(&expenses, view.totals.total_expense);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Food");
        assert_eq!(groups[0].total_amount, Decimal::from(80));
        assert_eq!(groups[0].percentage_of_period, 100);
        assert_eq!(groups[0].classification.kind, CategoryKind::Food);
    }

    #[test]
    fn fallback_balance_ignores_summary_income_and_expense() {
        let summary = SummaryReport {
            total_income: Some(Decimal::from(1000)),
            total_expenses: Some(Decimal::from(400)),
            ..Default::default()
        };
        let expenses = vec![tx("a", "Rent", 300, 0)];
        let incomes = vec![tx("i", "Salary", 500, 0)];
        let t = reconcile(Some(&summary), &expenses, &incomes);
        assert_eq!(t.total_income, Decimal::from(1000));
        assert_eq!(t.total_expense, Decimal::from(400));
        assert_eq!(t.total_balance, Decimal::from(200));
    }

    #[test]
    fn summary_balance_wins_when_present() {
        let summary = SummaryReport {
            total_balance: Some(Decimal::new(12345, 2)),
            ..Default::default()
        };
        let t = reconcile(Some(&summary), &[tx("a", "Food", 10, 0)], &[]);
        assert_eq!(t.total_balance, Decimal::new(12345, 2));
        assert_eq!(t.total_expense, Decimal::from(10));
    }

    #[test]
    fn empty_window_yields_no_groups() {
        let summary = SummaryReport::from_value(&json!({
            "last30DaysExpenses": {"total": 0, "transactions": []}
        }));
        assert!(expenses_by_category(Some(&summary)).is_empty());
        assert!(income_by_source(Some(&summary)).is_empty());
    }

    #[test]
    fn zero_period_total_gives_zero_percentages() {
        let txs = vec![tx("a", "Food", 10, 0), tx("b", "Fuel", 5, 1)];
        for g in group_by_label(&txs, Decimal::ZERO) {
            assert_eq!(g.percentage_of_period, 0);
        }
    }

    #[test]
    fn groups_by_raw_label_not_kind() {
        // both classify as Food but stay separate groups
        let txs = vec![
            tx("a", "Dining", 10, 0),
            tx("b", "Restaurant", 30, 1),
            tx("c", "", 5, 2),
            tx("d", "Dining", 15, 3),
        ];
        let groups = group_by_label(&txs, Decimal::from(60));
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["Restaurant", "Dining", "Other"]);
        assert_eq!(groups[1].total_amount, Decimal::from(25));
        assert_eq!(groups[1].percentage_of_period, 42);
        assert_eq!(groups[2].classification.kind, CategoryKind::Other);
    }

    #[test]
    fn percentage_rounding_drift_is_bounded() {
        let txs = vec![
            tx("a", "A", 1, 0),
            tx("b", "B", 1, 1),
            tx("c", "C", 1, 2),
        ];
        let groups = group_by_label(&txs, Decimal::from(3));
        let sum: i32 = groups.iter().map(|g| g.percentage_of_period as i32).sum();
        assert!((sum - 100).abs() <= groups.len() as i32);
        assert!(groups.iter().all(|g| g.percentage_of_period == 33));
    }

    #[test]
    fn percentage_rounds_half_up_and_clamps() {
        assert_eq!(percentage_of(Decimal::from(1), Decimal::from(8)), 13);
        assert_eq!(percentage_of(Decimal::from(50), Decimal::from(40)), 100);
        assert_eq!(percentage_of(Decimal::from(5), Decimal::from(-1)), 0);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        assert_eq!(percentage_of(Decimal::MAX, Decimal::new(1, 2)), 100);
        assert_eq!(percentage_of(Decimal::new(1, 0), Decimal::new(1, 28)), 100);
        assert_eq!(percentage_of(Decimal::MIN, Decimal::new(1, 2)), 0);

        let mut a = tx("a", "Food", 0, 0);
        a.amount = Decimal::MAX;
        let mut b = tx("b", "Food", 0, 1);
        b.amount = Decimal::MAX;
        let expenses = vec![a, b];

        let groups = group_by_label(&expenses, Decimal::ONE);
        assert_eq!(groups[0].total_amount, Decimal::MAX);
        assert_eq!(groups[0].percentage_of_period, 100);

        let t = reconcile(None, &expenses, &[]);
        assert_eq!(t.total_expense, Decimal::MAX);
        assert_eq!(t.total_balance, -Decimal::MAX);
        let t = reconcile(None, &expenses, &expenses);
        assert_eq!(t.total_balance, Decimal::ZERO);
    }

    #[test]
    fn oversized_window_entries_still_derive() {
        let summary = SummaryReport::from_value(&json!({
            "last30DaysExpenses": {
                "total": 1,
                "transactions": [
                    {"category": "Rent", "amount": 5e28},
                    {"category": "Rent", "amount": 5e28}
                ]
            }
        }));
        let view = DashboardView::derive(Some(&summary), &[], &[]);
        assert_eq!(view.expenses_by_category.len(), 1);
        assert_eq!(view.expenses_by_category[0].total_amount, Decimal::MAX);
        assert_eq!(view.expenses_by_category[0].percentage_of_period, 100);
    }

    #[test]
    fn window_entries_only_need_an_amount() {
        let summary = SummaryReport::from_value(&json!({
            "last30DaysExpenses": {
                "total": 100,
                "transactions": [
                    {"_id": "1", "category": "Food", "amount": 60, "date": "2025-03-01", "createdAt": "2025-03-01T10:00:00Z"},
                    {"_id": "2", "category": "Food", "amount": 40, "date": "2025-03-02"},
                    {"amount": "5"},
                    {"category": "Food", "date": "2025-03-02"}
                ]
            }
        }));
        let groups = expenses_by_category(Some(&summary));
        let got: Vec<_> = groups
            .iter()
            .map(|g| (g.label.as_str(), g.total_amount, g.percentage_of_period))
            .collect();
        assert_eq!(
            got,
            [("Food", Decimal::from(100), 100u8), ("Other", Decimal::from(5), 5u8)]
        );
    }

    #[test]
    fn fallback_recent_rows_drop_the_icon() {
        let mut e = tx("a", "Groceries", 12, 0);
        e.icon = Some("Coffee".into());
        let recent = select_recent(None, &[e]);
        assert_eq!(recent[0].icon, None);
        let c = classify(&recent[0].label, recent[0].icon.as_deref());
        assert_eq!(c.kind, CategoryKind::Shopping);
        assert_eq!(c.kind.glyph(), "shopping-bag");
    }

    #[test]
    fn recent_from_summary_is_truncated_in_order() {
        let entries: Vec<_> = (0..7)
            .map(|i| {
                json!({
                    "_id": format!("r{i}"),
                    "type": if i % 2 == 0 { "income" } else { "expense" },
                    "source": "Salary",
                    "amount": 10 + i,
                    "date": "2025-03-01T00:00:00.000Z",
                    "createdAt": "2025-03-01T00:00:00.000Z"
                })
            })
            .collect();
        let summary = SummaryReport::from_value(&json!({ "recentTransactions": entries }));
        let recent = select_recent(Some(&summary), &[]);
        let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r0", "r1", "r2", "r3", "r4"]);
        assert_eq!(recent[0].kind, TransactionKind::Income);
    }

    #[test]
    fn recent_fallback_sorts_expenses_newest_first() {
        let summary = SummaryReport {
            recent_transactions: Some(Vec::new()),
            ..Default::default()
        };
        let expenses: Vec<_> = (0..7).map(|i| tx(&format!("e{i}"), "Food", 1, i)).collect();
        let recent = select_recent(Some(&summary), &expenses);
        let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["e6", "e5", "e4", "e3", "e2"]);
        assert!(recent.iter().all(|r| r.kind == TransactionKind::Expense));
    }

    #[test]
    fn recent_length_is_min_of_five_and_available() {
        let expenses = vec![tx("a", "Food", 1, 0), tx("b", "Food", 1, 1)];
        assert_eq!(select_recent(None, &expenses).len(), 2);
        assert!(select_recent(None, &[]).is_empty());
    }

    #[test]
    fn view_reads_window_totals() {
        let summary = SummaryReport::from_value(&json!({
            "last30DaysExpenses": {
                "total": 100,
                "transactions": [
                    {"_id": "1", "category": "Uber", "amount": 25, "date": "2025-03-01", "createdAt": "2025-03-01T10:00:00Z"},
                    {"_id": "2", "category": "Groceries", "amount": 75, "date": "2025-03-02", "createdAt": "2025-03-02T10:00:00Z"}
                ]
            },
            "last60DaysIncome": {"transactions": [
                {"_id": "3", "source": "Salary", "amount": 900, "date": "2025-03-01", "createdAt": "2025-03-01T10:00:00Z"}
            ]}
        }));
        let view = DashboardView::derive(Some(&summary), &[], &[]);
        assert_eq!(view.last_30_days_expense_total, Decimal::from(100));
        assert_eq!(view.last_60_days_income_total, Decimal::ZERO);
        assert_eq!(view.expenses_by_category[0].label, "Groceries");
        assert_eq!(view.expenses_by_category[0].percentage_of_period, 75);
        assert_eq!(
            view.expenses_by_category[1].classification.kind,
            CategoryKind::Transport
        );
        // no income window total, so no share can be computed
        assert_eq!(view.income_by_source[0].percentage_of_period, 0);
    }
}
