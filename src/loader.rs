// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::models::{Listing, RawTable};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::fs;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 4] = ["Rank", "Title", "Type", "Region"];

/// Everything one pipeline run needs from the input file.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub listings: Vec<Listing>,
    pub table: RawTable,
}

/// ISO-8859-1: every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Read and parse a listings CSV file
pub fn load_listings(path: &Path) -> Result<LoadedData> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let data = parse_listings(&decode_latin1(&bytes))
        .with_context(|| format!("Failed to load listings from {}", path.display()))?;
    log::info!(
        "Loaded {} rows ({} columns) from {}",
        data.table.len(),
        data.table.headers.len(),
        path.display()
    );
    Ok(data)
}

/// Parse already-decoded CSV text.
pub fn parse_listings(text: &str) -> Result<LoadedData> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let header_record = reader.headers()?.clone();
    let headers: Vec<String> = header_record.iter().map(|h| h.to_string()).collect();
    check_columns(&headers)?;

    let mut listings = Vec::new();
    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = result.with_context(|| format!("Malformed CSV record at line {}", line))?;
        let listing: Listing = record
            .deserialize(Some(&header_record))
            .with_context(|| format!("Invalid listing at line {}", line))?;
        listings.push(listing);
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(LoadedData {
        listings,
        table: RawTable { headers, rows },
    })
}

/// Catch missing columns up front, so a file with no records still fails.
fn check_columns(headers: &[String]) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !headers.iter().any(|h| h == name))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required column(s): {} (found: {})",
            missing.join(", "),
            headers.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"Caf\xe9 \xc9lite"), "Café Élite");
        assert_eq!(decode_latin1(b"plain"), "plain");
        assert_eq!(decode_latin1(&[0xff]), "ÿ");
    }

    #[test]
    fn test_parse_strips_header_whitespace() -> Result<()> {
        let csv = " Rank ,Title,  Type,Region , Publisher\n\
                   1,Ludo King,Top Free,Gaming,Gametion\n\
                   2,PUBG MOBILE,Top Grossing,Gaming,Tencent\n";

        let data = parse_listings(csv)?;
        assert_eq!(
            data.table.headers,
            vec!["Rank", "Title", "Type", "Region", "Publisher"]
        );
        assert_eq!(data.listings.len(), 2);
        assert_eq!(
            data.listings[0],
            Listing::new(1, "Ludo King", "Top Free", "Gaming")
        );
        // extra columns are kept for display only
        assert_eq!(data.table.rows[1][4], "Tencent");
        Ok(())
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "Rank,Title,Type\n1,Ludo King,Top Free\n";
        let err = parse_listings(csv).unwrap_err();
        assert!(err.to_string().contains("Region"));
    }

    #[test]
    fn test_invalid_rank_is_error() {
        let csv = "Rank,Title,Type,Region\nfirst,Ludo King,Top Free,Gaming\n";
        let err = parse_listings(csv).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_zero_rank_is_error() {
        let csv = "Rank,Title,Type,Region\n1,Ludo King,Top Free,Gaming\n0,Carrom Pool,Top Free,Gaming\n";
        let err = parse_listings(csv).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 3"));
        assert!(message.contains("positive"));
    }

    #[test]
    fn test_empty_file_still_checks_columns() {
        let err = parse_listings("Rank,Title,Region\n").unwrap_err();
        assert!(err.to_string().contains("Type"));
    }

    #[test]
    fn test_rank_with_padding() -> Result<()> {
        let csv = "Rank,Title,Type,Region\n 7 ,Carrom Pool,Top Free,Gaming\n";
        let data = parse_listings(csv)?;
        assert_eq!(data.listings[0].rank, 7);
        Ok(())
    }

    #[test]
    fn test_load_latin1_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"Rank,Title,Type,Region\n1,Pok\xe9mon GO,Top Grossing,Jeux\n")?;

        let data = load_listings(file.path())?;
        assert_eq!(data.listings[0].title, "Pokémon GO");
        assert_eq!(data.table.rows[0][1], "Pokémon GO");
        Ok(())
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = load_listings(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
