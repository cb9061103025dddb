use anyhow::{Context, Result};
use image::RgbImage;
use log::debug;
use plotters::prelude::*;

use super::resample::{Interpolation, resample};
use crate::color::{Colormap, Normalize};
use crate::data::model::Matrix;

// ---------------------------------------------------------------------------
// Canvas geometry
// ---------------------------------------------------------------------------

/// Canvas size in inches (width, height).
pub const FIGURE_INCHES: (u32, u32) = (10, 5);
pub const DPI: u32 = 100;
pub const CANVAS_SIZE: (u32, u32) = (FIGURE_INCHES.0 * DPI, FIGURE_INCHES.1 * DPI);

// Axes region as fractions of the canvas, measured from the left / bottom.
const AXES_LEFT: f64 = 0.125;
const AXES_RIGHT: f64 = 0.9;
const AXES_BOTTOM: f64 = 0.11;
const AXES_TOP: f64 = 0.88;

// Share of the axes region handed to the colorbar and the gap before it.
const COLORBAR_FRACTION: f64 = 0.15;
const COLORBAR_PAD: f64 = 0.05;
const COLORBAR_ASPECT: f64 = 20.0;

const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 70;
const COLORBAR_LABEL_AREA: u32 = 60;
const FONT: (&str, i32) = ("sans-serif", 14);

pub const X_AXIS_LABEL: &str = "qy (nm⁻¹)";
pub const Y_AXIS_LABEL: &str = "qz (nm⁻¹)";

/// A rectangle in canvas pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Where the heat-map and the optional colorbar sit on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub heatmap: PixelRect,
    pub colorbar: Option<PixelRect>,
}

/// Lay out a `rows`×`cols` heat-map with square cells.
///
/// The heat-map is centred in the axes region; with a colorbar the region
/// first gives up a strip on its right-hand side.
pub fn layout(rows: usize, cols: usize, with_colorbar: bool) -> Layout {
    let (w, h) = (CANVAS_SIZE.0 as f64, CANVAS_SIZE.1 as f64);
    let left = AXES_LEFT * w;
    let top = (1.0 - AXES_TOP) * h;
    let mut region_w = (AXES_RIGHT - AXES_LEFT) * w;
    let region_h = (AXES_TOP - AXES_BOTTOM) * h;

    let colorbar = with_colorbar.then(|| {
        let full_w = region_w;
        region_w = full_w * (1.0 - COLORBAR_FRACTION - COLORBAR_PAD);
        PixelRect {
            x: (left + region_w + COLORBAR_PAD * full_w).round() as u32,
            y: top.round() as u32,
            width: (region_h / COLORBAR_ASPECT).round().max(1.0) as u32,
            height: region_h.round() as u32,
        }
    });

    let aspect = rows.max(1) as f64 / cols.max(1) as f64;
    let (plot_w, plot_h) = if region_h / region_w > aspect {
        (region_w, region_w * aspect)
    } else {
        (region_h / aspect, region_h)
    };

    let heatmap = PixelRect {
        x: (left + (region_w - plot_w) / 2.0).round() as u32,
        y: (top + (region_h - plot_h) / 2.0).round() as u32,
        width: plot_w.round().max(1.0) as u32,
        height: plot_h.round().max(1.0) as u32,
    };

    Layout { heatmap, colorbar }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// What to draw besides the heat-map itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureOptions {
    /// Axis labels when true, a colorbar when false.
    pub show_axes: bool,
    pub interpolation: Interpolation,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            show_axes: true,
            interpolation: Interpolation::Gaussian,
        }
    }
}

/// Draw `matrix` onto a fresh white canvas of `CANVAS_SIZE`.
pub fn draw_figure(matrix: &Matrix, colormap: &Colormap, options: &FigureOptions) -> Result<RgbImage> {
    let (width, height) = CANVAS_SIZE;
    let (rows, cols) = (matrix.rows(), matrix.cols());
    let layout = layout(rows, cols, !options.show_axes);
    let norm = match matrix.finite_range() {
        Some((lo, hi)) => Normalize::new(lo, hi),
        None => Normalize::new(0.0, 1.0),
    };
    debug!("layout {layout:?}, value range {norm:?}");

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        draw_heatmap(&root, matrix, colormap, &norm, layout.heatmap, options.interpolation)?;
        draw_axes(&root, rows, cols, layout.heatmap, options.show_axes)?;
        if let Some(bar) = layout.colorbar {
            draw_colorbar(&root, colormap, &norm, bar)?;
        }

        root.present()?;
    }

    RgbImage::from_raw(width, height, buffer).context("canvas buffer has the wrong size")
}

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    matrix: &Matrix,
    colormap: &Colormap,
    norm: &Normalize,
    rect: PixelRect,
    interpolation: Interpolation,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let raster = resample(
        matrix.values(),
        rect.width as usize,
        rect.height as usize,
        interpolation,
    );
    for ((row, col), &v) in raster.indexed_iter() {
        // Bad pixels stay background.
        if !v.is_finite() {
            continue;
        }
        let color = colormap.color_at(norm.apply(v));
        root.draw_pixel(
            ((rect.x as usize + col) as i32, (rect.y as usize + row) as i32),
            &color,
        )?;
    }
    Ok(())
}

/// Frame, ticks in cell coordinates and, when asked for, the axis labels.
fn draw_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    rows: usize,
    cols: usize,
    rect: PixelRect,
    with_labels: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let area = root.clone().shrink(
        (rect.x - Y_LABEL_AREA, rect.y),
        (rect.width + Y_LABEL_AREA, rect.height + X_LABEL_AREA),
    );

    // Row 0 at the top: the y range runs from the last row up to the first.
    let x_range = -0.5..(cols as f64 - 0.5);
    let y_range = (rows as f64 - 0.5)..-0.5;
    let mut chart = ChartBuilder::on(&area)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(x_range, y_range)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(cols.min(8))
        .y_labels(rows.min(6))
        .x_label_formatter(&tick_label)
        .y_label_formatter(&tick_label)
        .label_style(FONT);
    if with_labels {
        mesh.x_desc(X_AXIS_LABEL).y_desc(Y_AXIS_LABEL);
    }
    mesh.draw()?;

    chart.plotting_area().draw(&Rectangle::new(
        [(-0.5, rows as f64 - 0.5), (cols as f64 - 0.5, -0.5)],
        BLACK.stroke_width(1),
    ))?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    colormap: &Colormap,
    norm: &Normalize,
    rect: PixelRect,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (lo, hi) = norm.display_range();
    let area = root
        .clone()
        .shrink((rect.x, rect.y), (rect.width + COLORBAR_LABEL_AREA, rect.height));

    let mut colorbar = ChartBuilder::on(&area)
        .set_label_area_size(LabelAreaPosition::Right, COLORBAR_LABEL_AREA)
        .build_cartesian_2d(0f64..1f64, lo..hi)?;

    let label = |v: &f64| colorbar_label(*v, lo, hi);
    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&label)
        .label_style(FONT)
        .draw()?;

    // One band per pixel row.
    let steps = rect.height.max(1);
    colorbar.draw_series((0..steps).map(|i| {
        let v0 = lo + (hi - lo) * i as f64 / steps as f64;
        let v1 = lo + (hi - lo) * (i + 1) as f64 / steps as f64;
        let color = colormap.color_at(norm.apply((v0 + v1) / 2.0));
        Rectangle::new([(0.0, v0), (1.0, v1)], color.filled())
    }))?;

    colorbar
        .plotting_area()
        .draw(&Rectangle::new([(0.0, lo), (1.0, hi)], BLACK.stroke_width(1)))?;
    Ok(())
}

fn tick_label(v: &f64) -> String {
    let v = if v.abs() < 1e-9 { 0.0 } else { *v };
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Colorbar tick text for a bar spanning `lo..hi`.
///
/// Precision follows the tick spacing. Ranges whose magnitude is below 1e-2
/// or reaches 1e5 switch to scientific notation.
fn colorbar_label(v: f64, lo: f64, hi: f64) -> String {
    let magnitude = lo.abs().max(hi.abs());
    let step = (hi - lo).abs() / 5.0;
    if v == 0.0 || v.abs() < step * 1e-9 {
        return "0".to_string();
    }
    if magnitude > 0.0 && !(1e-2..1e5).contains(&magnitude) {
        let exponent = magnitude.log10().floor();
        format!("{:.*e}", decimals_for(step / 10f64.powf(exponent)), v)
    } else {
        format!("{:.*}", decimals_for(step), v)
    }
}

/// Digits after the point needed to tell ticks `step` apart.
fn decimals_for(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    (-step.log10().floor()).clamp(0.0, 6.0) as usize
}
