// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{SummaryReport, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

/// Saturates at the `Decimal` range instead of overflowing.
pub fn sum_amounts(txs: &[Transaction]) -> Decimal {
    txs.iter().fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// Headline totals, preferring each summary field over the local sums.
///
/// The fallback balance is always `local income - local expense`, even when
/// the displayed income or expense came from the summary.
pub fn reconcile(
    summary: Option<&SummaryReport>,
    expenses: &[Transaction],
    incomes: &[Transaction],
) -> Totals {
    let fallback_expense = sum_amounts(expenses);
    let fallback_income = sum_amounts(incomes);
    Totals {
        total_expense: summary
            .and_then(|s| s.total_expenses)
            .unwrap_or(fallback_expense),
        total_income: summary
            .and_then(|s| s.total_income)
            .unwrap_or(fallback_income),
        total_balance: summary
            .and_then(|s| s.total_balance)
            .unwrap_or(fallback_income.saturating_sub(fallback_expense)),
    }
}
