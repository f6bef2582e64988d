// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// One ranked game row from a listings CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "Rank", deserialize_with = "positive_rank")]
    pub rank: u32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Region")]
    pub region: String,
}

impl Listing {
    #[cfg(test)]
    pub fn new(rank: u32, title: &str, kind: &str, region: &str) -> Self {
        Self {
            rank,
            title: title.to_string(),
            kind: kind.to_string(),
            region: region.to_string(),
        }
    }
}

/// Ranks may be padded with spaces in the file; zero is not a rank.
fn positive_rank<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    match raw.parse::<u32>() {
        Ok(0) => Err(de::Error::custom("Rank must be a positive integer, got '0'")),
        Ok(rank) => Ok(rank),
        Err(_) => Err(de::Error::custom(format!("Invalid Rank '{}'", raw))),
    }
}

/// The loaded file as displayed: stripped headers plus every record, extra
/// columns included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, same headers.
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
