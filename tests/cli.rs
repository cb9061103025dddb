use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_plotmatrix(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plotmatrix"))
        .args(args)
        .output()
        .expect("Failed to execute plotmatrix binary")
}

fn write_matrix(dir: &TempDir, name: &str, rows: &[Vec<f64>]) -> PathBuf {
    let text: String = rows
        .iter()
        .map(|row| {
            let line: Vec<String> = row.iter().map(|v| format!("{v:e}")).collect();
            line.join(" ") + "\n"
        })
        .collect();
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn ramp(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|r| (0..cols).map(|c| (r * cols + c) as f64 + 1.0).collect())
        .collect()
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn render(args: &[&str]) -> Vec<u8> {
    let output = run_plotmatrix(args);
    assert!(
        output.status.success(),
        "plotmatrix failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let out_idx = args.iter().position(|a| *a == "-o").unwrap() + 1;
    fs::read(args[out_idx]).unwrap()
}

#[test]
fn missing_input_exits_with_status_one() {
    let output = run_plotmatrix(&["-o", "out.png"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("an input data file is necessary"), "{stdout}");
}

#[test]
fn missing_output_exits_with_status_one() {
    let output = run_plotmatrix(&["-i", "in.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("an output file name is necessary"), "{stdout}");
}

#[test]
fn trace_line_is_columns_then_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_matrix(&dir, "data.txt", &ramp(3, 5));
    let out = dir.path().join("out.png");

    let output = run_plotmatrix(&["-i", s(&input), "-o", s(&out)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "5 3\n");
    assert!(out.exists());
}

#[test]
fn mask_matches_precomputed_product() {
    let dir = TempDir::new().unwrap();
    let data = ramp(6, 9);
    let mask: Vec<Vec<f64>> = (0..6)
        .map(|r| (0..9).map(|c| if (r + c) % 4 == 0 { 0.25 } else { 1.5 }).collect())
        .collect();
    let product: Vec<Vec<f64>> = data
        .iter()
        .zip(&mask)
        .map(|(d, m)| d.iter().zip(m).map(|(a, b)| a * b).collect())
        .collect();

    let data_path = write_matrix(&dir, "data.txt", &data);
    let mask_path = write_matrix(&dir, "mask.txt", &mask);
    let product_path = write_matrix(&dir, "product.txt", &product);
    let masked_out = dir.path().join("masked.png");
    let product_out = dir.path().join("product.png");

    let masked = render(&["-i", s(&data_path), "-m", s(&mask_path), "-o", s(&masked_out)]);
    let direct = render(&["-i", s(&product_path), "-o", s(&product_out)]);
    assert_eq!(masked, direct);
}

#[test]
fn mismatched_mask_fails() {
    let dir = TempDir::new().unwrap();
    let data_path = write_matrix(&dir, "data.txt", &ramp(4, 4));
    let mask_path = write_matrix(&dir, "mask.txt", &ramp(3, 2));
    let out = dir.path().join("out.png");

    let output = run_plotmatrix(&["-i", s(&data_path), "-m", s(&mask_path), "-o", s(&out)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mask"));
    assert!(!out.exists());
}

#[test]
fn log_switch_changes_the_image() {
    let dir = TempDir::new().unwrap();
    let input = write_matrix(&dir, "data.txt", &ramp(5, 8));
    let with_log = dir.path().join("log.png");
    let without_log = dir.path().join("raw.png");

    let a = render(&["-i", s(&input), "-o", s(&with_log), "-log", "1"]);
    let b = render(&["-i", s(&input), "-o", s(&without_log), "-log", "0"]);
    assert_ne!(a, b);
}

#[test]
fn axes_switch_changes_the_layout() {
    let dir = TempDir::new().unwrap();
    let input = write_matrix(&dir, "data.txt", &ramp(12, 6));
    let labelled = dir.path().join("axes.png");
    let colorbar = dir.path().join("bar.png");

    render(&["-i", s(&input), "-o", s(&labelled), "-axes", "1"]);
    render(&["-i", s(&input), "-o", s(&colorbar), "-axes", "0"]);

    let labelled = image::open(&labelled).unwrap().to_rgb8();
    let colorbar = image::open(&colorbar).unwrap().to_rgb8();
    // The colorbar strip widens the trimmed figure.
    assert!(colorbar.width() > labelled.width());
}

#[test]
fn non_integer_switch_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_matrix(&dir, "data.txt", &ramp(2, 2));
    let out = dir.path().join("out.png");

    let output = run_plotmatrix(&["-i", s(&input), "-o", s(&out), "-axes", "on"]);
    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("-axes"));
}

#[test]
fn unreadable_input_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.png");
    let missing = dir.path().join("nope.txt");

    let output = run_plotmatrix(&["-i", s(&missing), "-o", s(&out)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.txt"));
}

#[test]
fn output_format_follows_extension() {
    let dir = TempDir::new().unwrap();
    let input = write_matrix(&dir, "data.txt", &ramp(4, 4));
    let out = dir.path().join("out.jpg");

    let bytes = render(&["-i", s(&input), "-o", s(&out)]);
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
}

#[test]
fn identical_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_matrix(&dir, "data.txt", &ramp(7, 11));
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    let a = render(&["-i", s(&input), "-o", s(&first), "-axes", "0"]);
    let b = render(&["-i", s(&input), "-o", s(&second), "-axes", "0"]);
    assert_eq!(a, b);
}
