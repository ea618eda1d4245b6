// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ActivityRecord, SummaryReport, Transaction};

pub const RECENT_LIMIT: usize = 5;

/// Up to [`RECENT_LIMIT`] recent rows. Summary entries are taken in the order
/// the server sent them; otherwise the newest expenses by `recorded_at`.
/// Incomes never appear in the fallback list.
pub fn select_recent(
    summary: Option<&SummaryReport>,
    expenses: &[Transaction],
) -> Vec<ActivityRecord> {
    if let Some(recent) = summary
        .and_then(|s| s.recent_transactions.as_ref())
        .filter(|r| !r.is_empty())
    {
        return recent.iter().take(RECENT_LIMIT).cloned().collect();
    }

    let mut sorted: Vec<&Transaction> = expenses.iter().collect();
    // stable, so equal timestamps keep list order
    sorted.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    sorted
        .into_iter()
        .take(RECENT_LIMIT)
        .map(ActivityRecord::from_expense)
        .collect()
}
