// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::models::Listing;
use serde::Serialize;
use std::collections::HashSet;

/// Chart categories, matched as case-insensitive substrings of `Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Free,
    Paid,
    Grossing,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Free, Category::Paid, Category::Grossing];

    fn needle(&self) -> &'static str {
        match self {
            Category::Free => "free",
            Category::Paid => "paid",
            Category::Grossing => "grossing",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Free => "Top Free Games",
            Category::Paid => "Top Paid Games",
            Category::Grossing => "Top Grossing Games",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Free => "free",
            Category::Paid => "paid",
            Category::Grossing => "grossing",
        }
    }

    /// Categories are tested independently, so one `Type` can match several.
    pub fn matches(&self, kind: &str) -> bool {
        kind.to_lowercase().contains(self.needle())
    }
}

/// Distinct regions in order of first appearance.
pub fn regions(listings: &[Listing]) -> Vec<String> {
    let mut seen = HashSet::new();
    listings
        .iter()
        .filter(|l| seen.insert(l.region.as_str()))
        .map(|l| l.region.clone())
        .collect()
}

pub fn filter_region(listings: &[Listing], region: &str) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.region == region)
        .cloned()
        .collect()
}

/// Rows of one category, sorted by rank ascending. Ties keep file order.
pub fn partition(listings: &[Listing], category: Category) -> Vec<Listing> {
    let mut rows: Vec<Listing> = listings
        .iter()
        .filter(|l| category.matches(&l.kind))
        .cloned()
        .collect();
    rows.sort_by_key(|l| l.rank);
    rows
}
