// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::chart_data::{build_chart, ChartSpec, RankWindow};
use crate::config::Config;
use crate::datasets::{DataSource, Dataset};
use crate::loader::{self, LoadedData};
use crate::models::RawTable;
use crate::ranking::{self, Category};
use anyhow::Result;
use serde::Serialize;

/// The user's control state for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source: DataSource,
    /// `None` picks the first region in the file
    pub region: Option<String>,
    pub window: RankWindow,
}

impl Selection {
    pub fn new(source: DataSource, window: RankWindow) -> Self {
        Self {
            source,
            region: None,
            window,
        }
    }
}

/// One slot on the page: a chart, or the notice shown when there is nothing to chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Chart {
        category: Category,
        chart: ChartSpec,
    },
    Notice {
        category: Category,
        message: String,
    },
}

impl Panel {
    pub fn category(&self) -> Category {
        match self {
            Panel::Chart { category, .. } | Panel::Notice { category, .. } => *category,
        }
    }

    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            Panel::Chart { chart, .. } => Some(chart),
            Panel::Notice { .. } => None,
        }
    }
}

pub fn no_data_message(category: Category) -> String {
    format!("No data available for {}.", category.title())
}

/// Everything the presentation layer shows after one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub dataset: Dataset,
    pub source_path: String,
    pub uploaded: bool,
    /// First rows of an uploaded file
    pub preview: Option<RawTable>,
    pub regions: Vec<String>,
    pub region: String,
    pub window: RankWindow,
    pub panels: Vec<Panel>,
    pub table: RawTable,
}

impl DashboardView {
    pub fn title(&self) -> String {
        format!("Top Ranked Games by Category in {}", self.region)
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.panels.iter().filter_map(Panel::chart)
    }

    /// Serialized chart data, identical for identical inputs.
    pub fn chart_data_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.panels)?)
    }
}

pub struct Dashboard<'a> {
    config: &'a Config,
}

impl<'a> Dashboard<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn load(&self, source: &DataSource) -> Result<LoadedData> {
        let path = source.path(&self.config.data_dir);
        log::debug!(
            "Loading {} data from {}",
            if source.is_upload() { "uploaded" } else { "default" },
            path.display()
        );
        loader::load_listings(&path)
    }

    /// Full pass: load, filter, partition, window, chart.
    pub fn compute(&self, selection: &Selection) -> Result<DashboardView> {
        let window = self.config.validate_window(selection.window)?;
        let data = self.load(&selection.source)?;
        self.compute_from(selection, window, data)
    }

    fn compute_from(
        &self,
        selection: &Selection,
        window: RankWindow,
        data: LoadedData,
    ) -> Result<DashboardView> {
        let regions = ranking::regions(&data.listings);
        let region = resolve_region(&regions, selection.region.as_deref())?;
        let in_region = ranking::filter_region(&data.listings, &region);
        log::info!("{} listings in region '{}'", in_region.len(), region);

        let panels = Category::ALL
            .iter()
            .map(|&category| {
                let sorted = ranking::partition(&in_region, category);
                log::debug!("{:?}: {} rows before windowing", category, sorted.len());
                match build_chart(category.title(), &sorted, window) {
                    Some(chart) => Panel::Chart { category, chart },
                    None => Panel::Notice {
                        category,
                        message: no_data_message(category),
                    },
                }
            })
            .collect();

        let preview = selection
            .source
            .is_upload()
            .then(|| data.table.head(self.config.preview_rows));

        let view = DashboardView {
            dataset: selection.source.dataset(),
            source_path: selection
                .source
                .path(&self.config.data_dir)
                .display()
                .to_string(),
            uploaded: selection.source.is_upload(),
            preview,
            regions,
            region,
            window,
            panels,
            table: data.table,
        };
        log::info!(
            "{} of {} categories charted for '{}'",
            view.charts().count(),
            view.panels.len(),
            view.region
        );
        Ok(view)
    }
}

fn resolve_region(regions: &[String], wanted: Option<&str>) -> Result<String> {
    match wanted {
        Some(region) => {
            if regions.iter().any(|r| r == region) {
                Ok(region.to_string())
            } else {
                anyhow::bail!(
                    "Region '{}' not found. Available regions: {}",
                    region,
                    regions.join(", ")
                )
            }
        }
        None => regions
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No regions found in the loaded data")),
    }
}
