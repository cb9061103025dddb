use palette::{Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Diverging colormap
// ---------------------------------------------------------------------------

/// ColorBrewer RdYlBu control points, red end first.
const RD_YL_BU: [(f32, f32, f32); 11] = [
    (0.647_058_8, 0.0, 0.149_019_6),
    (0.843_137_3, 0.188_235_3, 0.152_941_2),
    (0.956_862_7, 0.427_451, 0.262_745_1),
    (0.992_156_9, 0.682_352_9, 0.380_392_2),
    (0.996_078_4, 0.878_431_4, 0.564_705_9),
    (1.0, 1.0, 0.749_019_6),
    (0.878_431_4, 0.952_941_2, 0.972_549),
    (0.670_588_2, 0.850_980_4, 0.913_725_5),
    (0.454_902, 0.678_431_4, 0.819_607_8),
    (0.270_588_2, 0.458_823_5, 0.705_882_4),
    (0.192_156_9, 0.211_764_7, 0.584_313_7),
];

/// Number of discrete entries in the lookup table.
pub const LUT_SIZE: usize = 256;

/// A scalar → colour lookup built from evenly spaced control points.
#[derive(Debug, Clone)]
pub struct Colormap {
    lut: Vec<RGBColor>,
}

impl Colormap {
    /// Reversed red–yellow–blue: low values blue, high values red.
    pub fn rd_yl_bu_r() -> Self {
        let stops: Vec<Srgb<f32>> = RD_YL_BU
            .iter()
            .rev()
            .map(|&(r, g, b)| Srgb::new(r, g, b))
            .collect();
        Self::from_stops(&stops)
    }

    /// Build a lookup table by linear interpolation between `stops`.
    pub fn from_stops(stops: &[Srgb<f32>]) -> Self {
        let lut = (0..LUT_SIZE)
            .map(|i| {
                let t = i as f32 / (LUT_SIZE - 1) as f32;
                let color = match stops.len() {
                    0 => Srgb::new(0.0, 0.0, 0.0),
                    1 => stops[0],
                    n => {
                        let scaled = t * (n - 1) as f32;
                        let lo = (scaled.floor() as usize).min(n - 2);
                        stops[lo].mix(stops[lo + 1], scaled - lo as f32)
                    }
                };
                let rgb: Srgb<u8> = color.into_format();
                RGBColor(rgb.red, rgb.green, rgb.blue)
            })
            .collect();
        Colormap { lut }
    }

    /// Colour for a normalised value in `[0, 1]`; out-of-range values clamp.
    pub fn color_at(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let idx = ((t * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
        self.lut[idx]
    }
}

// ---------------------------------------------------------------------------
// Normalisation: data value → [0, 1]
// ---------------------------------------------------------------------------

/// Linear map of `[vmin, vmax]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Normalize { vmin, vmax }
    }

    /// A degenerate range sends every value to 0.
    pub fn apply(&self, v: f64) -> f64 {
        if self.vmax > self.vmin {
            (v - self.vmin) / (self.vmax - self.vmin)
        } else {
            0.0
        }
    }

    /// Range shown on a colorbar, widened when `vmin == vmax`.
    pub fn display_range(&self) -> (f64, f64) {
        if self.vmax > self.vmin {
            return (self.vmin, self.vmax);
        }
        if self.vmin == 0.0 {
            (-0.05, 0.05)
        } else {
            let pad = 0.05 * self.vmin.abs();
            (self.vmin - pad, self.vmax + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_map_runs_blue_to_red() {
        let cmap = Colormap::rd_yl_bu_r();
        assert_eq!(cmap.color_at(0.0), RGBColor(49, 54, 149));
        assert_eq!(cmap.color_at(1.0), RGBColor(165, 0, 38));
    }

    #[test]
    fn midpoint_is_pale_yellow() {
        let cmap = Colormap::rd_yl_bu_r();
        let RGBColor(r, g, b) = cmap.color_at(0.5);
        assert!(r > 240 && g > 240 && b > 170 && b < 200, "({r}, {g}, {b})");
    }

    #[test]
    fn out_of_range_values_clamp() {
        let cmap = Colormap::rd_yl_bu_r();
        assert_eq!(cmap.color_at(-3.0), cmap.color_at(0.0));
        assert_eq!(cmap.color_at(7.0), cmap.color_at(1.0));
        assert_eq!(cmap.color_at(f64::NAN), cmap.color_at(0.0));
    }

    #[test]
    fn normalize_maps_range_linearly() {
        let norm = Normalize::new(2.0, 6.0);
        assert_eq!(norm.apply(2.0), 0.0);
        assert_eq!(norm.apply(4.0), 0.5);
        assert_eq!(norm.apply(6.0), 1.0);
    }

    #[test]
    fn degenerate_range_maps_to_zero_and_widens_for_display() {
        let norm = Normalize::new(3.0, 3.0);
        assert_eq!(norm.apply(3.0), 0.0);
        let (lo, hi) = norm.display_range();
        assert!(lo < 3.0 && hi > 3.0);

        assert_eq!(Normalize::new(0.0, 0.0).display_range(), (-0.05, 0.05));
    }
}
