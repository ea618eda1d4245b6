// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::classify::{classify, Classification};
use crate::models::{PeriodEntry, Transaction};

pub const FALLBACK_LABEL: &str = "Other";

/// Anything that can be grouped: a label and an amount.
pub trait Labeled {
    fn label(&self) -> &str;
    fn amount(&self) -> Decimal;
}

impl Labeled for Transaction {
    fn label(&self) -> &str {
        &self.label
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Labeled for PeriodEntry {
    fn label(&self) -> &str {
        &self.label
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub label: String,
    pub total_amount: Decimal,
    pub percentage_of_period: u8,
    pub classification: Classification,
}

/// `round(100 * amount / period_total)`, 0 when the total is not positive.
/// A share too large to represent saturates to 100.
pub fn percentage_of(amount: Decimal, period_total: Decimal) -> u8 {
    if period_total <= Decimal::ZERO {
        return 0;
    }
    let share = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.checked_div(period_total))
        .or_else(|| {
            amount
                .checked_div(period_total)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        });
    let pct = match share {
        Some(s) => s.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        None if amount > Decimal::ZERO => Decimal::ONE_HUNDRED,
        None => Decimal::ZERO,
    };
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

/// Group by raw label (blank becomes "Other"), sum, and sort by amount
/// descending. Groups with equal amounts keep first-seen order. Sums
/// saturate at the `Decimal` range.
pub fn group_by_label<T: Labeled>(items: &[T], period_total: Decimal) -> Vec<CategoryGroup> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for item in items {
        let label = match item.label().trim() {
            "" => FALLBACK_LABEL,
            _ => item.label(),
        };
        match groups.iter_mut().find(|(l, _)| l == label) {
            Some((_, sum)) => *sum = sum.saturating_add(item.amount()),
            None => groups.push((label.to_string(), item.amount())),
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .map(|(label, total_amount)| CategoryGroup {
            percentage_of_period: percentage_of(total_amount, period_total),
            classification: classify(&label, None),
            label,
            total_amount,
        })
        .collect()
}
