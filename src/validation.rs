// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input checks applied before anything is sent to the API.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionKind;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const EXPENSE_ICONS: &[&str] = &[
    "Shopping",
    "Food",
    "Transport",
    "Entertainment",
    "Coffee",
    "Home",
    "Phone",
    "Clothing",
    "Health",
    "Work",
    "Gift",
    "Travel",
    "Education",
    "Utilities",
];

pub const INCOME_ICONS: &[&str] = &[
    "Salary",
    "Freelance",
    "Investment",
    "Bonus",
    "Gift",
    "Savings",
    "Wallet",
    "Business",
    "Refund",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Full name must be at least 2 characters")]
    NameTooShort,
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Unknown icon '{given}', choose one of: {choices}")]
    UnknownIcon { given: String, choices: String },
    #[error("Amount must be greater than 0")]
    AmountTooSmall,
}

pub fn icons_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Expense => EXPENSE_ICONS,
        TransactionKind::Income => INCOME_ICONS,
    }
}

pub fn email(s: &str) -> Result<String, ValidationError> {
    let s = s.trim();
    if EMAIL_RE.is_match(s) {
        Ok(s.to_string())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn password(s: &str, min: usize) -> Result<(), ValidationError> {
    if s.chars().count() < min {
        return Err(ValidationError::PasswordTooShort(min));
    }
    Ok(())
}

pub fn full_name(s: &str) -> Result<String, ValidationError> {
    let s = s.trim();
    if s.chars().count() < 2 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(s.to_string())
}

/// Case-insensitive match against the offered icons, returning the
/// canonical spelling.
pub fn icon(kind: TransactionKind, given: &str) -> Result<&'static str, ValidationError> {
    let given = given.trim();
    if given.is_empty() {
        return Err(ValidationError::Required("Icon"));
    }
    let choices = icons_for(kind);
    choices
        .iter()
        .find(|c| c.eq_ignore_ascii_case(given))
        .copied()
        .ok_or_else(|| ValidationError::UnknownIcon {
            given: given.to_string(),
            choices: choices.join(", "),
        })
}

pub fn label(kind: TransactionKind, s: &str) -> Result<String, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Required(match kind {
            TransactionKind::Expense => "Category",
            TransactionKind::Income => "Source",
        }));
    }
    Ok(s.to_string())
}

pub fn amount(d: Decimal) -> Result<Decimal, ValidationError> {
    if d < Decimal::new(1, 2) {
        return Err(ValidationError::AmountTooSmall);
    }
    Ok(d)
}

/// A new expense or income ready to be posted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub icon: &'static str,
    pub label: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(
        kind: TransactionKind,
        icon_name: &str,
        label_text: &str,
        amount_value: Decimal,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Ok(NewTransaction {
            kind,
            icon: icon(kind, icon_name)?,
            label: label(kind, label_text)?,
            amount: amount(amount_value)?,
            date,
        })
    }
}
