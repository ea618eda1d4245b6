// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::{Decimal, RoundingStrategy};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts either a plain `YYYY-MM-DD` or an RFC 3339 timestamp and keeps
/// the calendar date (in UTC for timestamps).
pub fn parse_api_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    let ts = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD or RFC 3339", s))?;
    Ok(ts.naive_utc().date())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

fn cents(d: &Decimal) -> Decimal {
    d.abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1234.5` -> `$1234.50`; negative values render as `-$80.00`.
pub fn fmt_money(d: &Decimal) -> String {
    let sign = if d.is_sign_negative() && !d.is_zero() { "-" } else { "" };
    format!("{}${:.2}", sign, cents(d))
}

/// Like [`fmt_money`] with thousands separators: `$18,450.00`.
pub fn fmt_money_grouped(d: &Decimal) -> String {
    let plain = format!("{:.2}", cents(d));
    let (int_part, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if d.is_sign_negative() && !d.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac)
}

/// Short relative label for a transaction date as seen from `today`.
pub fn relative_day(date: NaiveDate, today: NaiveDate) -> String {
    let diff = (today - date).num_days();
    match diff {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", diff),
        _ => date.format("%b %-d").to_string(),
    }
}

pub fn progress_bar(percentage: u8, width: usize) -> String {
    let filled = (usize::from(percentage.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn api_dates_accept_both_shapes() {
        assert_eq!(parse_api_date("2025-03-04").unwrap(), d(2025, 3, 4));
        assert_eq!(
            parse_api_date("2025-03-04T00:00:00.000Z").unwrap(),
            d(2025, 3, 4)
        );
        assert!(parse_api_date("04/03/2025").is_err());
    }

    #[test]
    fn money_formats() {
        assert_eq!(fmt_money(&Decimal::new(-80, 0)), "-$80.00");
        assert_eq!(fmt_money(&Decimal::new(12345, 3)), "$12.35");
        assert_eq!(fmt_money_grouped(&Decimal::new(1845000, 2)), "$18,450.00");
        assert_eq!(fmt_money_grouped(&Decimal::new(999, 0)), "$999.00");
        assert_eq!(fmt_money_grouped(&Decimal::new(-1234567, 0)), "-$1,234,567.00");
    }

    #[test]
    fn relative_days() {
        let today = d(2025, 3, 10);
        assert_eq!(relative_day(today, today), "Today");
        assert_eq!(relative_day(d(2025, 3, 9), today), "Yesterday");
        assert_eq!(relative_day(d(2025, 3, 5), today), "5 days ago");
        assert_eq!(relative_day(d(2025, 2, 1), today), "Feb 1");
    }

    #[test]
    fn bars_scale_to_width() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(50, 4), "██░░");
        assert_eq!(progress_bar(100, 4), "████");
    }
}
