use clap::ValueEnum;
use ndarray::Array2;

/// Kernel used to map matrix cells onto output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Interpolation {
    /// Smooth Gaussian-weighted average of neighbouring cells.
    #[default]
    Gaussian,
    /// Each pixel takes the value of the cell it falls in.
    #[value(alias = "none")]
    Nearest,
}

/// Gaussian half-width in source cells, before scaling for downsampling.
const GAUSSIAN_SUPPORT: f64 = 2.0;

/// Pixels with less than this share of finite weight are left bad.
const MIN_FINITE_WEIGHT: f64 = 0.5;

/// `(source index, weight)` pairs contributing to one output pixel.
type Taps = Vec<(usize, f64)>;

/// Resample `values` onto a `width`×`height` pixel grid.
///
/// Row 0 of the result is the top of the image. Non-finite cells do not
/// contribute; a pixel dominated by them comes out `NaN`.
pub fn resample(
    values: &Array2<f64>,
    width: usize,
    height: usize,
    interpolation: Interpolation,
) -> Array2<f64> {
    let (rows, cols) = values.dim();
    if rows == 0 || cols == 0 || width == 0 || height == 0 {
        return Array2::from_elem((height, width), f64::NAN);
    }

    let col_taps = axis_taps(cols, width, interpolation);
    let row_taps = axis_taps(rows, height, interpolation);

    // Horizontal pass: rows × width partial sums.
    let mut sum = Array2::<f64>::zeros((rows, width));
    let mut finite = Array2::<f64>::zeros((rows, width));
    let mut total = Array2::<f64>::zeros((rows, width));
    for r in 0..rows {
        for (x, taps) in col_taps.iter().enumerate() {
            for &(c, w) in taps {
                let v = values[[r, c]];
                total[[r, x]] += w;
                if v.is_finite() {
                    sum[[r, x]] += w * v;
                    finite[[r, x]] += w;
                }
            }
        }
    }

    // Vertical pass.
    let mut out = Array2::<f64>::from_elem((height, width), f64::NAN);
    for (y, taps) in row_taps.iter().enumerate() {
        for x in 0..width {
            let (mut s, mut f, mut t) = (0.0, 0.0, 0.0);
            for &(r, w) in taps {
                s += w * sum[[r, x]];
                f += w * finite[[r, x]];
                t += w * total[[r, x]];
            }
            if t > 0.0 && f > 0.0 && f >= MIN_FINITE_WEIGHT * t {
                out[[y, x]] = s / f;
            }
        }
    }
    out
}

/// Source taps for every destination index along one axis.
///
/// Destination pixel `p` is centred on source coordinate
/// `(p + 0.5) * n_src / n_dst - 0.5`, cell centres sitting on integers.
fn axis_taps(n_src: usize, n_dst: usize, interpolation: Interpolation) -> Vec<Taps> {
    let ratio = n_src as f64 / n_dst as f64;
    let last = (n_src - 1) as f64;

    (0..n_dst)
        .map(|p| match interpolation {
            Interpolation::Nearest => {
                let i = (((p as f64 + 0.5) * ratio).floor() as usize).min(n_src - 1);
                vec![(i, 1.0)]
            }
            Interpolation::Gaussian => {
                let scale = ratio.max(1.0);
                let reach = GAUSSIAN_SUPPORT * scale;
                let u = (p as f64 + 0.5) * ratio - 0.5;
                let lo = (u - reach).ceil().clamp(0.0, last) as usize;
                let hi = (u + reach).floor().clamp(0.0, last) as usize;
                (lo..=hi)
                    .map(|i| {
                        let d = (i as f64 - u) / scale;
                        (i, (-2.0 * d * d).exp())
                    })
                    .collect()
            }
        })
        .collect()
}
