//! Palette struct and nearest-color matching.
//!
//! A [`Palette`] is an ordered, non-empty list of L\*a\*b\* colors. The
//! position of a color is its ID: the lookup table stores these indices and
//! the renderer resolves them back to a solid color or a texture tile.

use std::str::FromStr;

use super::distance::{distance_squared, DistanceMetric};
use super::error::PaletteError;
use crate::color::{CieLab, StdRgb};

/// An ordered set of candidate colors.
///
/// Each entry is kept in Lab for matching and in sRGB for painting. For
/// palettes built from sRGB the original value is kept; for palettes built
/// from Lab (texture averages) it is the gamut-clipped conversion.
///
/// Duplicates are allowed: two textures may well share an average color,
/// and matching resolves ties to the lowest index.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    lab: Vec<CieLab>,
    srgb: Vec<StdRgb>,
    distance_metric: DistanceMetric,
}

impl Palette {
    /// Create a palette from Lab colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use lab_mosaic::{CieLab, Palette};
    ///
    /// let palette = Palette::new(vec![CieLab::new(0.0, 0.0, 0.0), CieLab::new(100.0, 0.0, 0.0)]).unwrap();
    /// assert_eq!(palette.closest_index(CieLab::new(70.0, 0.0, 0.0)), 1);
    /// ```
    pub fn new(colors: Vec<CieLab>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        let srgb = colors.iter().map(|&c| StdRgb::from(c)).collect();
        Ok(Self {
            lab: colors,
            srgb,
            distance_metric: DistanceMetric::default(),
        })
    }

    /// Create a palette from sRGB colors, converting each to Lab.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn from_srgb(colors: &[StdRgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self::from_nonempty_srgb(colors))
    }

    pub(crate) fn from_nonempty_srgb(colors: &[StdRgb]) -> Self {
        debug_assert!(!colors.is_empty());
        Self {
            lab: colors.iter().map(|&c| CieLab::from(c)).collect(),
            srgb: colors.to_vec(),
            distance_metric: DistanceMetric::default(),
        }
    }

    /// Create a palette from hex color strings like "#FF0000" or "#F00".
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] if any hex string is invalid,
    /// or [`PaletteError::EmptyPalette`] for an empty list.
    ///
    /// # Example
    ///
    /// ```
    /// use lab_mosaic::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000000", "#FFFFFF", "#FF0000"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// ```
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, PaletteError> {
        let srgb = colors
            .iter()
            .map(|s| StdRgb::from_str(s.as_ref()).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_srgb(&srgb)
    }

    /// Every sRGB triple on a regular grid `0, step, 2*step, ..` up to 255.
    ///
    /// Red varies slowest and blue fastest. A step of 60 gives 125 colors,
    /// 15 gives 4913.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidGridStep`] unless `1 <= step <= 255`.
    pub fn quantization_grid(step: usize) -> Result<Self, PaletteError> {
        if step == 0 || step > 255 {
            return Err(PaletteError::InvalidGridStep(step));
        }
        let levels: Vec<u8> = (0..=255usize).step_by(step).map(|v| v as u8).collect();
        let mut colors = Vec::with_capacity(levels.len().pow(3));
        for &r in &levels {
            for &g in &levels {
                for &b in &levels {
                    colors.push(StdRgb::from_u8(r, g, b));
                }
            }
        }
        Ok(Self::from_nonempty_srgb(&colors))
    }

    /// Override the distance metric used by [`Palette::find_nearest`].
    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.distance_metric
    }

    /// Number of colors in the palette (always at least 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.lab.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lab.is_empty()
    }

    /// Lab color at `idx`.
    #[inline]
    pub fn color(&self, idx: usize) -> CieLab {
        self.lab[idx]
    }

    /// sRGB paint color at `idx`.
    #[inline]
    pub fn srgb(&self, idx: usize) -> StdRgb {
        self.srgb[idx]
    }

    /// All Lab colors in index order.
    #[inline]
    pub fn colors(&self) -> &[CieLab] {
        &self.lab
    }

    /// All sRGB paint colors in index order.
    #[inline]
    pub fn srgb_colors(&self) -> &[StdRgb] {
        &self.srgb
    }

    /// Index of the entry with the smallest squared Euclidean distance.
    ///
    /// Ties go to the lowest index. Repeated calls with the same input
    /// always return the same index.
    #[inline]
    pub fn closest_index(&self, target: CieLab) -> usize {
        self.closest_index_by(target, distance_squared)
    }

    /// Index of the nearest entry under an arbitrary distance function.
    ///
    /// `distance(target, entry)` is evaluated once per entry; ties go to the
    /// lowest index.
    ///
    /// # Example
    ///
    /// ```
    /// use lab_mosaic::{delta_e_2000, CieLab, Palette};
    ///
    /// let palette = Palette::from_hex(&["#FF0000", "#0000FF"]).unwrap();
    /// let target = CieLab::new(45.0, 60.0, 40.0);
    /// assert_eq!(palette.closest_index_by(target, delta_e_2000), 0);
    /// ```
    pub fn closest_index_by<F>(&self, target: CieLab, distance: F) -> usize
    where
        F: Fn(CieLab, CieLab) -> f64,
    {
        self.nearest_by(target, distance).0
    }

    /// Nearest entry and its distance under the palette's metric.
    ///
    /// For [`DistanceMetric::Euclidean`] the distance is squared.
    #[inline]
    pub fn find_nearest(&self, target: CieLab) -> (usize, f64) {
        let metric = self.distance_metric;
        self.nearest_by(target, |a, b| metric.distance(a, b))
    }

    #[inline]
    fn nearest_by<F>(&self, target: CieLab, distance: F) -> (usize, f64)
    where
        F: Fn(CieLab, CieLab) -> f64,
    {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (i, &candidate) in self.lab.iter().enumerate() {
            let dist = distance(target, candidate);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        (best_idx, best_dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::delta_e_2000;

    fn mixed() -> Palette {
        Palette::from_hex(&["#000", "#fff", "#f00", "#0f0", "#00f", "#808080", "#c0ffee"]).unwrap()
    }

    fn red_blue() -> Palette {
        Palette::from_srgb(&[StdRgb::from_u8(255, 0, 0), StdRgb::from_u8(0, 0, 255)]).unwrap()
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(vec![]).unwrap_err(), PaletteError::EmptyPalette);
        assert_eq!(Palette::from_srgb(&[]).unwrap_err(), PaletteError::EmptyPalette);
        let empty: [&str; 0] = [];
        assert_eq!(Palette::from_hex(&empty).unwrap_err(), PaletteError::EmptyPalette);
    }

    #[test]
    fn test_exact_match_returns_its_index() {
        let palette = mixed();
        for i in 0..palette.len() {
            assert_eq!(palette.closest_index(palette.color(i)), i);
        }
    }

    #[test]
    fn test_duplicates_resolve_to_lowest_index() {
        let c = CieLab::new(40.0, 10.0, 10.0);
        let palette = Palette::new(vec![CieLab::new(90.0, 0.0, 0.0), c, c, c]).unwrap();
        assert_eq!(palette.closest_index(c), 1);
    }

    #[test]
    fn test_equidistant_tie_goes_to_first() {
        let palette =
            Palette::new(vec![CieLab::new(40.0, 0.0, 0.0), CieLab::new(60.0, 0.0, 0.0)]).unwrap();
        assert_eq!(palette.closest_index(CieLab::new(50.0, 0.0, 0.0)), 0);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let palette = Palette::quantization_grid(60).unwrap();
        let target = CieLab::from(StdRgb::from_u8(33, 140, 201));
        let first = palette.closest_index(target);
        for _ in 0..10 {
            assert_eq!(palette.closest_index(target), first);
        }
    }

    #[test]
    fn test_reddish_matches_red() {
        let target = CieLab::from(StdRgb::from_u8(200, 50, 50));
        assert_eq!(red_blue().closest_index(target), 0);
        assert_eq!(red_blue().closest_index_by(target, delta_e_2000), 0);
    }

    #[test]
    fn test_find_nearest_reports_distance() {
        let palette =
            Palette::new(vec![CieLab::new(10.0, 0.0, 0.0), CieLab::new(50.0, 0.0, 0.0)]).unwrap();
        let (idx, dist) = palette.find_nearest(CieLab::new(47.0, 4.0, 0.0));
        assert_eq!(idx, 1);
        assert_eq!(dist, 25.0);

        let ciede = palette.with_distance_metric(DistanceMetric::Ciede2000);
        let (idx, dist) = ciede.find_nearest(CieLab::new(50.0, 0.0, 0.0));
        assert_eq!(idx, 1);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_quantization_grid() {
        let grid = Palette::quantization_grid(60).unwrap();
        assert_eq!(grid.len(), 125);
        assert_eq!(grid.srgb(0), StdRgb::BLACK);
        assert_eq!(grid.srgb(1), StdRgb::from_u8(0, 0, 60));
        assert_eq!(grid.srgb(124), StdRgb::from_u8(240, 240, 240));

        assert_eq!(Palette::quantization_grid(15).unwrap().len(), 18 * 18 * 18);
        assert_eq!(Palette::quantization_grid(255).unwrap().len(), 8);
        assert_eq!(
            Palette::quantization_grid(0).unwrap_err(),
            PaletteError::InvalidGridStep(0)
        );
    }

    #[test]
    fn test_from_hex_parse_error() {
        assert!(matches!(
            Palette::from_hex(&["#000", "#XYZ"]),
            Err(PaletteError::ParseColor(_))
        ));
    }

    #[test]
    fn test_lab_palette_gets_srgb_paint() {
        let palette = Palette::new(vec![CieLab::from(StdRgb::from_u8(12, 200, 99))]).unwrap();
        assert_eq!(palette.srgb(0), StdRgb::from_u8(12, 200, 99));
    }
}
