// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword classification of free-text labels into display categories.
//!
//! Matching is case-insensitive substring search, first match wins. The order
//! of the tables below is significant: a label such as "coffee shop" resolves
//! to Shopping because the shopping keywords are tested first.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryKind {
    Food,
    Shopping,
    Transport,
    Entertainment,
    Beverage,
    Housing,
    Clothing,
    Other,
}

impl CategoryKind {
    /// Icon name used when rendering the category.
    pub fn glyph(&self) -> &'static str {
        match self {
            CategoryKind::Food => "utensils",
            CategoryKind::Shopping => "shopping-bag",
            CategoryKind::Transport => "car",
            CategoryKind::Entertainment => "film",
            CategoryKind::Beverage => "coffee",
            CategoryKind::Housing => "wallet",
            CategoryKind::Clothing => "shopping-bag",
            CategoryKind::Other => "tag",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CategoryKind::Food => "amber",
            CategoryKind::Shopping => "blue",
            CategoryKind::Transport => "green",
            CategoryKind::Entertainment => "red",
            CategoryKind::Beverage => "orange",
            CategoryKind::Housing => "purple",
            CategoryKind::Clothing => "pink",
            CategoryKind::Other => "rose",
        }
    }
}

/// Result of classifying a label: the kind plus its color token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: CategoryKind,
    pub color: &'static str,
}

impl From<CategoryKind> for Classification {
    fn from(kind: CategoryKind) -> Self {
        Classification {
            kind,
            color: kind.color(),
        }
    }
}

const ICON_RULES: &[(&[&str], CategoryKind)] = &[
    (&["food", "utensil"], CategoryKind::Food),
    (&["shop"], CategoryKind::Shopping),
    (&["car", "transport"], CategoryKind::Transport),
    (&["film", "entertainment"], CategoryKind::Entertainment),
    (&["coffee"], CategoryKind::Beverage),
];

const LABEL_RULES: &[(&[&str], CategoryKind)] = &[
    (&["food", "dining", "restaurant"], CategoryKind::Food),
    (&["shop", "groceries", "grocery"], CategoryKind::Shopping),
    (&["transport", "uber", "car", "fuel"], CategoryKind::Transport),
    (&["entertainment", "movie", "netflix"], CategoryKind::Entertainment),
    (&["coffee", "cafe"], CategoryKind::Beverage),
    (&["rent", "house"], CategoryKind::Housing),
    (&["cloth", "fashion"], CategoryKind::Clothing),
];

fn first_match(text: &str, rules: &[(&[&str], CategoryKind)]) -> Option<CategoryKind> {
    let lower = text.to_lowercase();
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, kind)| *kind)
}

/// Classify a label, consulting the icon hint first when one is given.
pub fn classify(label: &str, icon_hint: Option<&str>) -> Classification {
    icon_hint
        .filter(|hint| !hint.is_empty())
        .and_then(|hint| first_match(hint, ICON_RULES))
        .or_else(|| first_match(label, LABEL_RULES))
        .unwrap_or(CategoryKind::Other)
        .into()
}
