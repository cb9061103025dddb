/// Rendering: matrix → canvas → trimmed image file.
///
/// ```text
///   Matrix
///     │
///     ▼
///   ┌──────────┐
///   │ resample │  cells → pixel grid (Gaussian or nearest)
///   └──────────┘
///     │
///     ▼
///   ┌──────────┐
///   │  figure  │  1000×500 canvas: heat-map, ticks, labels or colorbar
///   └──────────┘
///     │
///     ▼
///   ┌──────────┐
///   │  output  │  tight trim, encode by file extension
///   └──────────┘
/// ```

pub mod figure;
pub mod output;
pub mod resample;

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::color::Colormap;
use crate::data::model::Matrix;

pub use figure::FigureOptions;
pub use resample::Interpolation;

/// Render `matrix` and write it to `path`; returns the saved image size.
pub fn render_to_file(matrix: &Matrix, options: &FigureOptions, path: &Path) -> Result<(u32, u32)> {
    let colormap = Colormap::rd_yl_bu_r();
    let canvas = figure::draw_figure(matrix, &colormap, options)?;
    let trimmed = output::trim(&canvas, output::TRIM_PAD);
    output::save(&trimmed, path)?;

    let (w, h) = trimmed.dimensions();
    info!("wrote {} ({w}x{h} px)", path.display());
    Ok((w, h))
}
