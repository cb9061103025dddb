use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::render::{FigureOptions, Interpolation};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Clone)]
#[command(
    name = "plotmatrix",
    version,
    about = "Render a whitespace-delimited numeric matrix as a heat-map image.",
    after_help = "Long options also take a single dash: -axes 0, -log 0, -interp nearest."
)]
pub struct Args {
    /// Input data file: one row per line, whitespace-separated values.
    #[arg(short = 'i', value_name = "FILE")]
    pub input: Option<String>,

    /// Output image; the format follows the extension (png, jpg, bmp, tiff, gif).
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<String>,

    /// Mask file multiplied elementwise into the data before rendering.
    #[arg(short = 'm', value_name = "FILE")]
    pub mask: Option<String>,

    /// 1 labels the axes, 0 draws a colorbar instead.
    #[arg(long, value_name = "INT", allow_negative_numbers = true)]
    pub axes: Option<String>,

    /// 1 takes the natural log before rendering, 0 renders raw values.
    #[arg(long, value_name = "INT", allow_negative_numbers = true)]
    pub log: Option<String>,

    /// Resampling kernel used to draw the matrix.
    #[arg(long, value_enum, default_value_t = Interpolation::Gaussian)]
    pub interp: Interpolation,
}

/// Long options that also answer to a single dash.
const SINGLE_DASH_LONGS: &[&str] = &["axes", "log", "interp"];

/// Short options; a single-dash word starting with one of these is that
/// flag with an attached value, never a long prefix.
const SHORT_FLAGS: &[char] = &['i', 'o', 'm'];

/// Rewrite `-axes`, `-log` and `-interp` (and their prefixes) into the
/// `--flag` form clap understands. Everything else passes through.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str().and_then(normalize_flag) {
            Some(long) => OsString::from(long),
            None => arg,
        })
        .collect()
}

fn normalize_flag(arg: &str) -> Option<String> {
    let body = arg.strip_prefix('-')?;
    if body.starts_with('-') {
        return None;
    }
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let long = resolve_long(name)?;
    Some(match value {
        Some(value) => format!("--{long}={value}"),
        None => format!("--{long}"),
    })
}

/// The long option `name` spells out in full or as an unambiguous prefix.
fn resolve_long(name: &str) -> Option<&'static str> {
    if let Some(long) = SINGLE_DASH_LONGS.iter().copied().find(|long| *long == name) {
        return Some(long);
    }
    if name.is_empty() || name.starts_with(SHORT_FLAGS) {
        return None;
    }
    let mut candidates = SINGLE_DASH_LONGS
        .iter()
        .copied()
        .filter(|long| long.starts_with(name));
    match (candidates.next(), candidates.next()) {
        (Some(long), None) => Some(long),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Validated options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("error: an input data file is necessary")]
    MissingInput,
    #[error("error: an output file name is necessary")]
    MissingOutput,
    #[error("invalid integer value '{value}' for -{flag}")]
    InvalidFlag { flag: &'static str, value: String },
}

impl ConfigError {
    /// The two missing-path errors are reported on stdout with status 1.
    pub fn is_missing_path(&self) -> bool {
        matches!(self, ConfigError::MissingInput | ConfigError::MissingOutput)
    }
}

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub mask_path: Option<PathBuf>,
    pub show_axes: bool,
    pub apply_log: bool,
    pub interpolation: Interpolation,
}

impl RenderOptions {
    /// Validate parsed arguments. `-i` is checked before `-o`; an empty
    /// value counts as absent.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let input_path = non_empty(args.input).ok_or(ConfigError::MissingInput)?;
        let output_path = non_empty(args.output).ok_or(ConfigError::MissingOutput)?;
        Ok(RenderOptions {
            input_path,
            output_path,
            mask_path: non_empty(args.mask),
            show_axes: parse_switch("axes", args.axes.as_deref(), true)?,
            apply_log: parse_switch("log", args.log.as_deref(), true)?,
            interpolation: args.interp,
        })
    }

    pub fn figure_options(&self) -> FigureOptions {
        FigureOptions {
            show_axes: self.show_axes,
            interpolation: self.interpolation,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// An integer flag compared against zero; absent or empty keeps `default`.
fn parse_switch(flag: &'static str, value: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    match value {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(|n| n != 0)
            .map_err(|_| ConfigError::InvalidFlag {
                flag,
                value: raw.to_string(),
            }),
    }
}
