//! # Signal heatmap interpolation
//!
//! Projects a session's point measurements onto a rectangular grid, one map
//! per AP or one combined strongest-signal map.
//!
//! ## Available Operations
//! - [`HeatmapBuilder::build_for_ap`] - Interpolated grid for one BSSID
//! - [`HeatmapBuilder::build_combined`] - Per-cell maximum across all BSSIDs
//!
//! Three interpolation methods are supported. Nearest-neighbor copies the
//! closest sample. Inverse-distance weighting (the default, power 2) blends
//! samples by `1/d^p` and returns an exact sample verbatim when a cell lands
//! on it. Bilinear blends the nearest sample from each surrounding quadrant
//! and falls back to IDW when a quadrant is empty. Cells with no sample
//! within the interpolation radius stay unknown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NetkitError, NetkitResult};
use crate::survey::{SurveyBounds, SurveyMeasurement};
use crate::types::Bssid;

/// Spatial interpolation method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Value of the closest sample
    Nearest,
    /// Inverse-distance weighting with the given power
    Idw { power: f64 },
    /// Quadrant-based bilinear blend, IDW fallback
    Bilinear,
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        InterpolationMethod::Idw { power: 2.0 }
    }
}

/// Grid and interpolation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Cell edge length (m)
    pub resolution_m: f64,
    /// Samples farther than this from a cell do not influence it (m)
    pub max_interpolation_distance_m: f64,
    pub method: InterpolationMethod,
}

impl HeatmapConfig {
    /// 1 m cells, 10 m interpolation radius, IDW with power 2
    pub fn new() -> Self {
        Self {
            resolution_m: 1.0,
            max_interpolation_distance_m: 10.0,
            method: InterpolationMethod::default(),
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolated signal grid
///
/// Cell (0, 0) sits at the bounds' minimum corner; row `r`, column `c` maps
/// to world position `(min_x + c * resolution, min_y + r * resolution)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHeatmap {
    pub bounds: SurveyBounds,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Meters per cell used to build the grid
    pub resolution_m: f64,
    /// RSSI per cell, `None` where no sample was in range; indexed
    /// `[row][column]`
    pub cells: Vec<Vec<Option<f64>>>,
    /// Measurements the grid was built from
    pub measurement_count: usize,
    /// The AP this map describes, `None` for the combined map
    pub bssid: Option<Bssid>,
}

impl SignalHeatmap {
    /// Value at a cell, `None` outside the grid or where unknown
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// World position of a cell center
    pub fn cell_position(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.bounds.min_x + col as f64 * self.resolution_m,
            self.bounds.min_y + row as f64 * self.resolution_m,
        )
    }

    /// Fraction of cells with a known value, 0-1
    pub fn known_fraction(&self) -> f64 {
        let total = self.grid_width * self.grid_height;
        if total == 0 {
            return 0.0;
        }
        let known = self
            .cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count();
        known as f64 / total as f64
    }
}

/// One positioned RSSI sample used during interpolation
#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f64,
    y: f64,
    rssi_dbm: f64,
}

/// Heatmap construction from survey measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapBuilder {
    config: HeatmapConfig,
}

impl HeatmapBuilder {
    /// Validated construction; resolution and radius must be positive
    pub fn new(config: HeatmapConfig) -> NetkitResult<Self> {
        if config.resolution_m <= 0.0 || !config.resolution_m.is_finite() {
            return Err(NetkitError::InvalidResolution(config.resolution_m));
        }
        if config.max_interpolation_distance_m <= 0.0 {
            return Err(NetkitError::InvalidResolution(
                config.max_interpolation_distance_m,
            ));
        }
        Ok(Self { config })
    }

    /// Interpolated map of one AP's signal over the bounds
    pub fn build_for_ap(
        &self,
        measurements: &[SurveyMeasurement],
        bounds: SurveyBounds,
        bssid: Bssid,
    ) -> SignalHeatmap {
        let samples: Vec<Sample> = measurements
            .iter()
            .filter_map(|m| {
                m.visible_bssids.get(&bssid).map(|rssi| Sample {
                    x: m.location.x,
                    y: m.location.y,
                    rssi_dbm: *rssi,
                })
            })
            .collect();
        self.build_grid(&samples, bounds, measurements.len(), Some(bssid))
    }

    /// Strongest-signal map: per cell, the maximum over every AP seen in the
    /// measurements
    pub fn build_combined(
        &self,
        measurements: &[SurveyMeasurement],
        bounds: SurveyBounds,
    ) -> SignalHeatmap {
        let mut bssids: Vec<Bssid> = measurements
            .iter()
            .flat_map(|m| m.visible_bssids.keys().copied())
            .collect();
        bssids.sort_unstable();
        bssids.dedup();

        let mut combined = self.build_grid(&[], bounds, measurements.len(), None);
        for bssid in bssids {
            let map = self.build_for_ap(measurements, bounds, bssid);
            for (row, cells) in map.cells.into_iter().enumerate() {
                for (col, value) in cells.into_iter().enumerate() {
                    let target = &mut combined.cells[row][col];
                    *target = match (*target, value) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        (a, b) => a.or(b),
                    };
                }
            }
        }
        combined
    }

    fn build_grid(
        &self,
        samples: &[Sample],
        bounds: SurveyBounds,
        measurement_count: usize,
        bssid: Option<Bssid>,
    ) -> SignalHeatmap {
        let res = self.config.resolution_m;
        let grid_width = (bounds.width() / res).floor() as usize + 1;
        let grid_height = (bounds.height() / res).floor() as usize + 1;

        let mut cells = vec![vec![None; grid_width]; grid_height];
        for (row, row_cells) in cells.iter_mut().enumerate() {
            for (col, cell) in row_cells.iter_mut().enumerate() {
                let x = bounds.min_x + col as f64 * res;
                let y = bounds.min_y + row as f64 * res;
                *cell = self.interpolate(samples, x, y);
            }
        }
        debug!(grid_width, grid_height, samples = samples.len(), "built heatmap");
        SignalHeatmap {
            bounds,
            grid_width,
            grid_height,
            resolution_m: res,
            cells,
            measurement_count,
            bssid,
        }
    }

    fn interpolate(&self, samples: &[Sample], x: f64, y: f64) -> Option<f64> {
        let in_range: Vec<(f64, &Sample)> = samples
            .iter()
            .map(|s| (((s.x - x).powi(2) + (s.y - y).powi(2)).sqrt(), s))
            .filter(|(d, _)| *d <= self.config.max_interpolation_distance_m)
            .collect();
        if in_range.is_empty() {
            return None;
        }
        match self.config.method {
            InterpolationMethod::Nearest => in_range
                .iter()
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, s)| s.rssi_dbm),
            InterpolationMethod::Idw { power } => Some(idw(&in_range, power)),
            InterpolationMethod::Bilinear => Some(self.bilinear(&in_range, x, y)),
        }
    }

    /// Nearest in-range sample per quadrant around the point; when all four
    /// quadrants contribute, blend them by inverse distance, otherwise fall
    /// back to plain IDW over everything in range.
    fn bilinear(&self, in_range: &[(f64, &Sample)], x: f64, y: f64) -> f64 {
        let mut corners: [Option<(f64, &Sample)>; 4] = [None; 4];
        for &(distance, sample) in in_range {
            let quadrant = match (sample.x <= x, sample.y <= y) {
                (true, true) => 0,
                (false, true) => 1,
                (true, false) => 2,
                (false, false) => 3,
            };
            if corners[quadrant].is_none_or(|(best, _)| distance < best) {
                corners[quadrant] = Some((distance, sample));
            }
        }
        if corners.iter().all(Option::is_some) {
            let corner_samples: Vec<(f64, &Sample)> =
                corners.iter().map(|c| c.unwrap()).collect();
            idw(&corner_samples, 2.0)
        } else {
            idw(in_range, 2.0)
        }
    }
}

/// Inverse-distance weighting; an exact hit returns that sample verbatim
fn idw(samples: &[(f64, &Sample)], power: f64) -> f64 {
    const EXACT_HIT: f64 = 1e-9;
    if let Some((_, exact)) = samples.iter().find(|(d, _)| *d < EXACT_HIT) {
        return exact.rssi_dbm;
    }
    let mut weight_sum = 0.0;
    let mut value_sum = 0.0;
    for (distance, sample) in samples {
        let weight = 1.0 / distance.powf(power);
        weight_sum += weight;
        value_sum += weight * sample.rssi_dbm;
    }
    value_sum / weight_sum
}
