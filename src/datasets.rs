// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// The bundled country datasets, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum Dataset {
    #[default]
    #[value(name = "uae", alias = "united-arab-emirates")]
    UnitedArabEmirates,
    #[value(name = "saudi-arabia", alias = "saudi")]
    SaudiArabia,
    Egypt,
    Iraq,
    Morocco,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::UnitedArabEmirates,
        Dataset::SaudiArabia,
        Dataset::Egypt,
        Dataset::Iraq,
        Dataset::Morocco,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::UnitedArabEmirates => "United-Arab-Emirates",
            Dataset::SaudiArabia => "Saudi Arabia",
            Dataset::Egypt => "Egypt",
            Dataset::Iraq => "Iraq",
            Dataset::Morocco => "Morocco",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::UnitedArabEmirates => "extracted_uae.csv",
            Dataset::SaudiArabia => "extracted_Saudi Arabia.csv",
            Dataset::Egypt => "extracted_Egypt.csv",
            Dataset::Iraq => "extracted_Iraq.csv",
            Dataset::Morocco => "extracted_Morocco.csv",
        }
    }

    pub fn default_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    /// Accepts the display label, the CLI name, or an alias, ignoring case.
    pub fn parse(input: &str) -> Result<Dataset> {
        let wanted = input.trim();
        for dataset in Dataset::ALL {
            if dataset.label().eq_ignore_ascii_case(wanted) {
                return Ok(dataset);
            }
        }
        Dataset::from_str(wanted, true).map_err(|_| {
            let options: Vec<&str> = Dataset::ALL.iter().map(|d| d.label()).collect();
            anyhow::anyhow!(
                "Unknown dataset '{}'. Choose one of: {}",
                input,
                options.join(", ")
            )
        })
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the listings come from for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Default(Dataset),
    Upload { dataset: Dataset, path: PathBuf },
}

impl DataSource {
    /// An uploaded file always wins over the dataset default.
    pub fn select(dataset: Dataset, upload: Option<PathBuf>) -> Result<DataSource> {
        match upload {
            Some(path) => {
                let is_csv = path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false);
                if !is_csv {
                    anyhow::bail!("Uploaded file must be a .csv file: {}", path.display());
                }
                Ok(DataSource::Upload { dataset, path })
            }
            None => Ok(DataSource::Default(dataset)),
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            DataSource::Default(dataset) => *dataset,
            DataSource::Upload { dataset, .. } => *dataset,
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, DataSource::Upload { .. })
    }

    pub fn path(&self, data_dir: &Path) -> PathBuf {
        match self {
            DataSource::Default(dataset) => dataset.default_path(data_dir),
            DataSource::Upload { path, .. } => path.clone(),
        }
    }
}
