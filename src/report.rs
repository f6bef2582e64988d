// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::bar_chart::{self, ImageFormat};
use crate::dashboard::{DashboardView, Panel};
use crate::models::RawTable;
use crate::ranking::Category;
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_CELL_WIDTH: usize = 40;

/// How chart files are written for one run.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    pub format: ImageFormat,
    pub size: (u32, u32),
    pub json: bool,
}

/// Lowercase ASCII alphanumerics, everything else collapsed to `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::new();
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "region".to_string()
    } else {
        slug
    }
}

pub fn chart_path(dir: &Path, view: &DashboardView, category: Category, ext: &str) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}_{}-{}.{}",
        slugify(view.dataset.label()),
        slugify(&view.region),
        category.slug(),
        view.window.start,
        view.window.end,
        ext
    ))
}

/// Where the whole page's chart data goes when JSON output is on.
pub fn page_data_path(dir: &Path, view: &DashboardView) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}-{}.json",
        slugify(view.dataset.label()),
        slugify(&view.region),
        view.window.start,
        view.window.end
    ))
}

/// Render every chart panel; notices get `None`.
pub fn write_charts(view: &DashboardView, options: &OutputOptions) -> Result<Vec<Option<PathBuf>>> {
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.output_dir.display()
        )
    })?;

    let mut written = Vec::new();
    for panel in &view.panels {
        let Some(chart) = panel.chart() else {
            written.push(None);
            continue;
        };

        let path = chart_path(
            &options.output_dir,
            view,
            panel.category(),
            options.format.extension(),
        );
        bar_chart::render_chart(chart, &path, options.format, options.size)?;
        written.push(Some(path));
    }

    if options.json {
        let json_path = page_data_path(&options.output_dir, view);
        fs::write(&json_path, view.chart_data_json()?)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        log::info!("Wrote chart data to {}", json_path.display());
    }
    Ok(written)
}

fn cell(value: &str) -> String {
    if value.chars().count() > MAX_CELL_WIDTH {
        let head: String = value.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

/// Aligned text grid with a leading row-index column.
pub fn format_table(table: &RawTable) -> String {
    let index_width = table.len().saturating_sub(1).to_string().len();
    let columns = table
        .rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; columns];
    let all_rows = std::iter::once(&table.headers).chain(table.rows.iter());
    for row in all_rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell(value).chars().count());
        }
    }

    let render_row = |index: &str, row: &[String]| {
        let mut line = format!("{:>width$}", index, width = index_width);
        for (i, width) in widths.iter().enumerate() {
            let value = row.get(i).map(|v| cell(v)).unwrap_or_default();
            let pad = width - value.chars().count();
            line.push_str("  ");
            line.push_str(&value);
            line.push_str(&" ".repeat(pad));
        }
        line.trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&render_row("", table.headers.as_slice()));
    out.push('\n');
    for (i, row) in table.rows.iter().enumerate() {
        out.push_str(&render_row(&i.to_string(), row.as_slice()));
        out.push('\n');
    }
    out
}

/// The page as text, top to bottom. `written` holds one entry per panel.
pub fn format_report(
    view: &DashboardView,
    written: &[Option<PathBuf>],
    attribution: &str,
    show_table: bool,
) -> String {
    let mut out = String::new();

    match &view.preview {
        Some(preview) => {
            let _ = writeln!(out, "Data Preview:");
            out.push_str(&format_table(preview));
        }
        None => {
            let _ = writeln!(out, "Using default data.");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "# {}", view.title());
    let _ = writeln!(
        out,
        "Dataset: {} | Regions: {} | Ranks {}..{}",
        view.dataset,
        view.regions.join(", "),
        view.window.start,
        view.window.end
    );
    let _ = writeln!(out);

    for (i, panel) in view.panels.iter().enumerate() {
        match panel {
            Panel::Chart { chart, .. } => match written.get(i).and_then(|p| p.as_ref()) {
                Some(path) => {
                    let _ = writeln!(
                        out,
                        "✅ {} ({} games): {}",
                        chart.title,
                        chart.bars.len(),
                        path.display()
                    );
                }
                None => {
                    let _ = writeln!(out, "{} ({} games)", chart.title, chart.bars.len());
                }
            },
            Panel::Notice { message, .. } => {
                let _ = writeln!(out, "{}", message);
            }
        }
    }

    let _ = writeln!(out);
    if show_table {
        let _ = writeln!(out, "## {}", view.region);
        let _ = writeln!(out, "#### Top 50 Matrix");
        if view.table.is_empty() {
            let _ = writeln!(out, "No rows.");
        } else {
            out.push_str(&format_table(&view.table));
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{}", attribution);
    out
}
