use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::Array2;

use super::model::Matrix;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a matrix from a whitespace-delimited text file.
///
/// Each non-blank line is a row and each token a column value. Text after a
/// `#` is a comment. A file holding a single row or a single column still
/// gives a 2D matrix (1×C or R×1).
pub fn load_matrix(path: &Path) -> Result<Matrix> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_matrix(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Write a matrix in the same layout `load_matrix` reads.
pub fn save_matrix(path: &Path, matrix: &Matrix) -> Result<()> {
    let mut text = String::new();
    for row in matrix.values().rows() {
        let mut first = true;
        for v in row {
            if !first {
                text.push(' ');
            }
            first = false;
            write!(text, "{v:e}").context("formatting matrix value")?;
        }
        text.push('\n');
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Text parsing
// ---------------------------------------------------------------------------

pub fn parse_matrix(text: &str) -> Result<Matrix> {
    let mut values = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        let before = values.len();

        for tok in content.split_whitespace() {
            let v = tok
                .parse::<f64>()
                .with_context(|| format!("line {}: '{tok}' is not a number", line_no + 1))?;
            values.push(v);
        }

        let found = values.len() - before;
        if found == 0 {
            continue;
        }
        match cols {
            None => cols = Some(found),
            Some(expected) if expected != found => bail!(
                "line {}: expected {expected} columns but found {found}",
                line_no + 1
            ),
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.context("no numeric data found")?;
    let values = Array2::from_shape_vec((rows, cols), values)
        .context("assembling matrix from rows")?;
    Ok(Matrix::new(values))
}
