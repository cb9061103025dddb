use std::process;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use plotmatrix::cli::{self, Args, RenderOptions};
use plotmatrix::data::loader::load_matrix;
use plotmatrix::render;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse_from(cli::normalize_args(std::env::args_os()));
    let options = match RenderOptions::from_args(args) {
        Ok(options) => options,
        Err(err) if err.is_missing_path() => {
            println!("{err}");
            process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    run(&options)
}

fn run(options: &RenderOptions) -> Result<()> {
    let mut matrix = load_matrix(&options.input_path)?;
    info!(
        "loaded {} ({} rows x {} columns)",
        options.input_path.display(),
        matrix.rows(),
        matrix.cols()
    );

    if let Some(mask_path) = &options.mask_path {
        let mask = load_matrix(mask_path)?;
        matrix = matrix.masked(&mask)?;
        info!("applied mask {}", mask_path.display());
    }

    // Part of the tool's stdout contract: columns, then rows.
    println!("{} {}", matrix.cols(), matrix.rows());

    if options.apply_log {
        matrix = matrix.ln();
        let bad = matrix.non_finite_count();
        if bad > 0 {
            warn!("{bad} cells are not finite after the log transform");
        }
    }
    if matrix.finite_range().is_none() {
        warn!("no finite values to render; the heat-map will be blank");
    }

    render::render_to_file(&matrix, &options.figure_options(), &options.output_path)?;
    Ok(())
}
