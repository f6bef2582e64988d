// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::chart_data::{ChartSpec, Rgb};
use anyhow::{Context, Result};
use clap::ValueEnum;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const TITLE_LABEL_AREA: u32 = 230;
const COLORBAR_AREA: u32 = 230;
const MAX_TITLE_CHARS: usize = 32;
const MIN_PLOT_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

fn to_plotters(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn shorten(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let head: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Render a chart to an image file.
pub fn render_chart(
    spec: &ChartSpec,
    output_path: &Path,
    format: ImageFormat,
    size: (u32, u32),
) -> Result<()> {
    let (width, height) = size;
    if width < TITLE_LABEL_AREA + COLORBAR_AREA + MIN_PLOT_WIDTH || height < MIN_HEIGHT {
        anyhow::bail!(
            "Chart size {}x{} is too small, need at least {}x{}",
            width,
            height,
            TITLE_LABEL_AREA + COLORBAR_AREA + MIN_PLOT_WIDTH,
            MIN_HEIGHT
        );
    }

    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            draw_bar_chart(&root, spec)?;
            root.present()
                .with_context(|| format!("Failed to write chart: {}", output_path.display()))?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            draw_bar_chart(&root, spec)?;
            root.present()
                .with_context(|| format!("Failed to write chart: {}", output_path.display()))?;
        }
    }
    log::debug!(
        "Rendered '{}' ({} bars) to {}",
        spec.title,
        spec.bars.len(),
        output_path.display()
    );
    Ok(())
}

fn draw_bar_chart<DB>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let background = to_plotters(spec.theme.background);
    let text_color = to_plotters(spec.theme.text);
    root.fill(&background)?;

    let (width, _) = root.dim_in_pixel();
    let (plot_area, colorbar_area) =
        root.split_horizontally(width.saturating_sub(COLORBAR_AREA) as i32);

    // Leave room past the longest bar for its rank label
    let x_max = spec.max_reversed_rank() as f64 * 1.12 + 1.0;
    let rows = spec.bars.len() as f64;

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(
            &spec.title,
            ("sans-serif", f64::from(spec.theme.title_size))
                .into_font()
                .color(&text_color),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(TITLE_LABEL_AREA)
        .build_cartesian_2d(0f64..x_max, 0f64..rows)?;

    // Titles are drawn per bar below, not as axis ticks
    let x_ticks = |x: &f64| format!("{:.0}", x);
    let y_ticks = |_: &f64| String::new();

    let mut mesh = chart.configure_mesh();
    if !spec.theme.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_desc(spec.x_title.as_str())
        .y_desc(spec.y_title.as_str())
        .x_label_formatter(&x_ticks)
        .y_label_formatter(&y_ticks)
        .axis_style(text_color)
        .label_style(("sans-serif", 12.0).into_font().color(&text_color))
        .axis_desc_style(("sans-serif", 16.0).into_font().color(&text_color))
        .draw()?;

    // Row 0 is the best rank and sits at the bottom of the axis
    chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
        let y = i as f64;
        Rectangle::new(
            [(0.0, y + 0.15), (f64::from(bar.reversed_rank), y + 0.85)],
            to_plotters(bar.color).filled(),
        )
    }))?;

    let value_style = ("sans-serif", 12.0)
        .into_font()
        .color(&text_color)
        .pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            bar.label.clone(),
            (f64::from(bar.reversed_rank) + x_max * 0.01, i as f64 + 0.5),
            value_style.clone(),
        )
    }))?;

    let tick_style = ("sans-serif", f64::from(spec.theme.tick_size))
        .into_font()
        .color(&text_color)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (i, bar) in spec.bars.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(0.0, i as f64 + 0.5));
        root.draw_text(&shorten(&bar.title), &tick_style, (x - 8, y))?;
    }

    draw_colorbar(&colorbar_area, spec, &text_color)?;
    Ok(())
}

/// Vertical Viridis strip: the best rank is the bright bottom end.
fn draw_colorbar<DB>(area: &DrawingArea<DB, Shift>, spec: &ChartSpec, text_color: &RGBColor) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (_, height) = area.dim_in_pixel();
    let top = 90;
    let bottom = (height as i32 - 80).max(top + 10);
    let left = 20;
    let right = 45;

    area.draw_text(
        &spec.colorbar_title,
        &("sans-serif", 12.0).into_font().color(text_color),
        (left - 10, top - 30),
    )?;

    let span = (bottom - top) as f32;
    for y in top..bottom {
        let color: RGBColor = ViridisRGB.get_color_normalized((y - top) as f32, 0.0, span);
        area.draw(&Rectangle::new([(left, y), (right, y + 1)], color.filled()))?;
    }

    let label_style = ("sans-serif", 12.0)
        .into_font()
        .color(text_color)
        .pos(Pos::new(HPos::Left, VPos::Center));
    area.draw_text(&spec.rank_max.to_string(), &label_style, (right + 8, top))?;
    if spec.rank_max != spec.rank_min {
        area.draw_text(&spec.rank_min.to_string(), &label_style, (right + 8, bottom))?;
    }
    Ok(())
}
