use std::path::PathBuf;

use anyhow::Result;
use ndarray::Array2;

use plotmatrix::data::loader::save_matrix;
use plotmatrix::data::model::Matrix;

const ROWS: usize = 120;
const COLS: usize = 240;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Seeded xoshiro256** generator, so every run writes the same sample.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal deviate via the Box-Muller transform.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Scattering-like intensity: Bragg rods along qz on a decaying background,
/// strongest near the specular column. Always positive, so it logs cleanly.
fn generate_pattern(rng: &mut SimpleRng) -> Array2<f64> {
    let specular = COLS as f64 / 2.0;
    let rods = [-60.0, -30.0, 30.0, 60.0];

    Array2::from_shape_fn((ROWS, COLS), |(r, c)| {
        let qy = c as f64 - specular;
        let qz = (ROWS - r) as f64;

        let background = 50.0 * (-qz / 40.0).exp() + 1.0;
        let specular_rod = gaussian(qy, 0.0, 3.0, 2000.0) * (-qz / 25.0).exp();
        let bragg: f64 = rods
            .iter()
            .map(|&q0| gaussian(qy, q0, 2.5, 400.0) * (-qz / 60.0).exp())
            .sum();

        let signal = background + specular_rod + bragg;
        (signal + rng.gauss(0.0, 0.02 * signal)).max(0.5)
    })
}

/// Zero out a beam stop over the specular rod and one detector gap row.
fn generate_mask() -> Array2<f64> {
    let specular = COLS / 2;
    let gap_row = ROWS / 3;

    Array2::from_shape_fn((ROWS, COLS), |(r, c)| {
        let in_beam_stop = r >= ROWS - 25 && c.abs_diff(specular) <= 5;
        if in_beam_stop || r == gap_row {
            0.0
        } else {
            1.0
        }
    })
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)?;

    let mut rng = SimpleRng::new(42);
    let data_path = out_dir.join("sample_data.txt");
    let mask_path = out_dir.join("sample_mask.txt");

    save_matrix(&data_path, &Matrix::new(generate_pattern(&mut rng)))?;
    save_matrix(&mask_path, &Matrix::new(generate_mask()))?;

    println!(
        "Wrote {ROWS}x{COLS} sample to {} and mask to {}",
        data_path.display(),
        mask_path.display()
    );
    Ok(())
}
