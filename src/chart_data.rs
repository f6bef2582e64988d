// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::models::Listing;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::RGBColor;
use serde::{Serialize, Serializer};

pub const X_AXIS_TITLE: &str = "Rank";
pub const Y_AXIS_TITLE: &str = "Game Title";
pub const COLORBAR_TITLE: &str = "Rank (1 = Best, 50 = Least Good)";

/// Half-open `[start, end)` window over a rank-sorted partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankWindow {
    pub start: usize,
    pub end: usize,
}

impl RankWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Clamped to `rows`; an inverted or out-of-range window gives an empty slice.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let end = self.end.min(rows.len());
        if self.start >= end {
            return &[];
        }
        &rows[self.start..end]
    }
}

/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl From<RGBColor> for Rgb {
    fn from(color: RGBColor) -> Self {
        Rgb::new(color.0, color.1, color.2)
    }
}

/// Position of `rank` on the reversed scale: the smallest rank maps to 1.0.
pub fn scale_position(rank: u32, min_rank: u32, max_rank: u32) -> f64 {
    if max_rank <= min_rank {
        return 1.0;
    }
    let t = (rank.saturating_sub(min_rank)) as f64 / (max_rank - min_rank) as f64;
    1.0 - t
}

pub fn rank_color(rank: u32, min_rank: u32, max_rank: u32) -> Rgb {
    let t = scale_position(rank, min_rank, max_rank) as f32;
    Rgb::from(ViridisRGB.get_color(t))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub background: Rgb,
    pub text: Rgb,
    pub title_size: u32,
    pub tick_size: u32,
    pub show_grid: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb::new(0, 0, 0),
            text: Rgb::new(255, 255, 255),
            title_size: 24,
            tick_size: 10,
            show_grid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub title: String,
    pub rank: u32,
    pub reversed_rank: u32,
    /// Hover text
    pub region: String,
    pub color: Rgb,
    /// Shown outside the bar end
    pub label: String,
}

/// Shaped data for one horizontal bar chart. `bars[0]` is the best rank and
/// sits at the bottom of the category axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub colorbar_title: String,
    pub rank_min: u32,
    pub rank_max: u32,
    pub theme: Theme,
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    /// Longest bar, used for the value axis.
    pub fn max_reversed_rank(&self) -> u32 {
        self.bars.iter().map(|b| b.reversed_rank).max().unwrap_or(0)
    }
}

/// Build a chart from rows already sorted by rank. Returns `None` when the
/// window holds no rows; the caller shows a notice instead.
pub fn build_chart(title: &str, sorted: &[Listing], window: RankWindow) -> Option<ChartSpec> {
    let visible = window.slice(sorted);
    let rank_max = visible.iter().map(|l| l.rank).max()?;
    let rank_min = visible.iter().map(|l| l.rank).min()?;

    let bars = visible
        .iter()
        .map(|l| Bar {
            title: l.title.clone(),
            rank: l.rank,
            // scaled to the window, not the whole partition
            reversed_rank: (rank_max - l.rank) + 1,
            region: l.region.clone(),
            color: rank_color(l.rank, rank_min, rank_max),
            label: l.rank.to_string(),
        })
        .collect();

    Some(ChartSpec {
        title: title.to_string(),
        x_title: X_AXIS_TITLE.to_string(),
        y_title: Y_AXIS_TITLE.to_string(),
        colorbar_title: COLORBAR_TITLE.to_string(),
        rank_min,
        rank_max,
        theme: Theme::default(),
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ranked(ranks: &[u32]) -> Vec<Listing> {
        ranks
            .iter()
            .map(|&r| Listing::new(r, &format!("Game {}", r), "Top Free", "Gaming"))
            .collect()
    }

    #[test]
    fn test_reversed_rank_uses_window_max() {
        let rows = ranked(&[3, 5, 8]);
        let chart = build_chart("Top Free Games", &rows, RankWindow::new(0, 20)).unwrap();
        let reversed: Vec<u32> = chart.bars.iter().map(|b| b.reversed_rank).collect();
        assert_eq!(reversed, vec![6, 4, 1]);

        // dropping rank 8 from the window rescales the rest
        let chart = build_chart("Top Free Games", &rows, RankWindow::new(0, 2)).unwrap();
        let reversed: Vec<u32> = chart.bars.iter().map(|b| b.reversed_rank).collect();
        assert_eq!(reversed, vec![3, 1]);
    }

    #[test]
    fn test_labels_show_rank_not_reversed() {
        let rows = ranked(&[3, 5, 8]);
        let chart = build_chart("Top Free Games", &rows, RankWindow::new(0, 3)).unwrap();
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["3", "5", "8"]);
        assert!(chart.bars.iter().all(|b| b.region == "Gaming"));
    }

    #[test]
    fn test_window_clamps_to_rows() {
        let rows = ranked(&(1..=12).collect::<Vec<_>>());
        assert!(build_chart("Top Paid Games", &rows, RankWindow::new(40, 50)).is_none());

        let chart = build_chart("Top Paid Games", &rows, RankWindow::new(10, 50)).unwrap();
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].rank, 11);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let rows = ranked(&[1, 2, 3]);
        assert!(build_chart("x", &rows, RankWindow::new(2, 1)).is_none());
        assert!(build_chart("x", &rows, RankWindow::new(1, 1)).is_none());
        assert!(build_chart("x", &[], RankWindow::new(0, 20)).is_none());
    }

    #[test]
    fn test_best_rank_gets_brightest_color() {
        let rows = ranked(&[1, 10, 20]);
        let chart = build_chart("x", &rows, RankWindow::new(0, 20)).unwrap();
        assert_eq!(chart.bars[0].color, Rgb::from(ViridisRGB.get_color(1.0f32)));
        assert_eq!(chart.bars[2].color, Rgb::from(ViridisRGB.get_color(0.0f32)));
        assert_eq!(chart.rank_min, 1);
        assert_eq!(chart.rank_max, 20);
        assert_eq!(chart.max_reversed_rank(), 20);
    }

    #[test]
    fn test_scale_position() {
        assert_relative_eq!(scale_position(1, 1, 21), 1.0);
        assert_relative_eq!(scale_position(21, 1, 21), 0.0);
        assert_relative_eq!(scale_position(6, 1, 21), 0.75);
        assert_relative_eq!(scale_position(4, 4, 4), 1.0);
    }

    #[test]
    fn test_colors_come_from_viridis_ends() {
        let brightest = Rgb::from(ViridisRGB.get_color(1.0f32));
        let darkest = Rgb::from(ViridisRGB.get_color(0.0f32));
        assert_eq!(rank_color(1, 1, 20), brightest);
        assert_eq!(rank_color(20, 1, 20), darkest);
        // purple end: red and blue, almost no green
        assert!(darkest.g < 0x10 && darkest.b > darkest.r);
        // yellow end: strong red and green, little blue
        assert!(brightest.r > 0xf0 && brightest.g > 0xe0 && brightest.b < 0x30);
        // a window of equal ranks is all bright
        assert_eq!(rank_color(7, 7, 7), brightest);
    }

    #[test]
    fn test_extreme_ranks_do_not_overflow() {
        let rows = vec![
            Listing::new(1, "Ludo King", "Top Free", "Gaming"),
            Listing::new(u32::MAX, "Last", "Top Free", "Gaming"),
        ];
        let chart = build_chart("Top Free Games", &rows, RankWindow::new(0, 2)).unwrap();
        let reversed: Vec<u32> = chart.bars.iter().map(|b| b.reversed_rank).collect();
        assert_eq!(reversed, vec![u32::MAX, 1]);
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&Rgb::new(0x44, 0x01, 0x54)).unwrap();
        assert_eq!(json, "\"#440154\"");
    }

    #[test]
    fn test_dark_theme() {
        let chart = build_chart("Top Grossing Games", &ranked(&[1]), RankWindow::new(0, 1)).unwrap();
        assert_eq!(chart.theme.background.to_hex(), "#000000");
        assert_eq!(chart.theme.text.to_hex(), "#ffffff");
        assert_eq!(chart.title, "Top Grossing Games");
        assert_eq!(chart.x_title, "Rank");
        assert_eq!(chart.y_title, "Game Title");
    }
}
