//! # Dead-zone detection
//!
//! Finds contiguous weak-coverage regions on a signal heatmap.
//!
//! ## Available Operations
//! - [`DeadZoneDetector::detect`] - Connected weak regions with severity
//! - [`DeadZoneDetector::generate_report`] - Zone counts per severity
//! - [`DeadZoneDetector::suggest_improvements`] - One action per serious zone
//!
//! Each cell gets the most severe tier whose RSSI bound it falls under
//! (a cell with no signal counts as negative infinity, so always Critical).
//! Cells of equal severity are grouped by 4-neighborhood connected-component
//! labeling; components smaller than the detector's minimum area are noise
//! and dropped.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::heatmap::SignalHeatmap;
use crate::survey::SurveyLocation;
use crate::types::Bssid;

/// How badly a zone is covered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum DeadZoneSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeadZoneSeverity {
    /// Remediation priority, higher first
    pub fn priority(&self) -> u8 {
        match self {
            DeadZoneSeverity::Low => 1,
            DeadZoneSeverity::Medium => 2,
            DeadZoneSeverity::High => 3,
            DeadZoneSeverity::Critical => 4,
        }
    }
}

/// RSSI upper bound per severity tier (dBm)
///
/// A cell is assigned the most severe tier whose bound it does not exceed;
/// signal above the Low bound is considered covered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadZoneThresholds {
    pub critical_dbm: f64,
    pub high_dbm: f64,
    pub medium_dbm: f64,
    pub low_dbm: f64,
}

impl DeadZoneThresholds {
    /// Bounds tuned for indoor client coverage: -98 / -85 / -75 / -70 dBm
    pub fn new() -> Self {
        Self {
            critical_dbm: -98.0,
            high_dbm: -85.0,
            medium_dbm: -75.0,
            low_dbm: -70.0,
        }
    }

    fn classify(&self, rssi_dbm: Option<f64>) -> Option<DeadZoneSeverity> {
        let Some(rssi) = rssi_dbm else {
            return Some(DeadZoneSeverity::Critical);
        };
        if rssi <= self.critical_dbm {
            Some(DeadZoneSeverity::Critical)
        } else if rssi <= self.high_dbm {
            Some(DeadZoneSeverity::High)
        } else if rssi <= self.medium_dbm {
            Some(DeadZoneSeverity::Medium)
        } else if rssi <= self.low_dbm {
            Some(DeadZoneSeverity::Low)
        } else {
            None
        }
    }
}

impl Default for DeadZoneThresholds {
    fn default() -> Self {
        Self::new()
    }
}

/// One contiguous weak-coverage region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadZone {
    pub severity: DeadZoneSeverity,
    /// Region size in grid cells
    pub area_cells: usize,
    /// Mean world position of the region's cells
    pub centroid: SurveyLocation,
    /// Grid extent as (min_row, max_row, min_col, max_col)
    pub bbox: (usize, usize, usize, usize),
    /// Mean RSSI over cells with a known value; `None` when every cell was
    /// unknown
    pub avg_signal_dbm: Option<f64>,
    /// The AP whose map the zone was found on, `None` for the combined map
    pub affected_bssid: Option<Bssid>,
}

/// Zone counts for one detection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeadZoneReport {
    pub total_zones: usize,
    pub total_area_cells: usize,
    pub zones_by_severity: BTreeMap<DeadZoneSeverity, usize>,
    pub has_critical_zones: bool,
}

/// Suggested remediation for one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementAction {
    pub description: String,
    /// From the zone severity, higher first
    pub priority: u8,
    pub location: SurveyLocation,
}

/// Weak-region detection over heatmaps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadZoneDetector {
    pub thresholds: DeadZoneThresholds,
    /// Components below this many cells are dropped as noise
    pub min_zone_cells: usize,
}

impl DeadZoneDetector {
    /// Default thresholds with a 4-cell minimum area
    pub fn new() -> Self {
        Self {
            thresholds: DeadZoneThresholds::new(),
            min_zone_cells: 4,
        }
    }

    /// Detect weak regions on a heatmap, most severe first
    pub fn detect(&self, heatmap: &SignalHeatmap) -> Vec<DeadZone> {
        let height = heatmap.grid_height;
        let width = heatmap.grid_width;
        let severities: Vec<Vec<Option<DeadZoneSeverity>>> = (0..height)
            .map(|row| {
                (0..width)
                    .map(|col| self.thresholds.classify(heatmap.cell(row, col)))
                    .collect()
            })
            .collect();

        let mut visited = vec![vec![false; width]; height];
        let mut zones = Vec::new();
        for row in 0..height {
            for col in 0..width {
                let Some(severity) = severities[row][col] else {
                    continue;
                };
                if visited[row][col] {
                    continue;
                }
                let component = flood_fill(&severities, &mut visited, row, col, severity);
                if component.len() < self.min_zone_cells {
                    continue;
                }
                zones.push(self.zone_from_component(heatmap, severity, &component));
            }
        }
        zones.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then(b.area_cells.cmp(&a.area_cells))
        });
        zones
    }

    fn zone_from_component(
        &self,
        heatmap: &SignalHeatmap,
        severity: DeadZoneSeverity,
        component: &[(usize, usize)],
    ) -> DeadZone {
        let mut bbox = (usize::MAX, 0, usize::MAX, 0);
        let mut x_sum = 0.0;
        let mut y_sum = 0.0;
        let mut signal_sum = 0.0;
        let mut signal_count = 0usize;
        for &(row, col) in component {
            bbox.0 = bbox.0.min(row);
            bbox.1 = bbox.1.max(row);
            bbox.2 = bbox.2.min(col);
            bbox.3 = bbox.3.max(col);
            let (x, y) = heatmap.cell_position(row, col);
            x_sum += x;
            y_sum += y;
            if let Some(rssi) = heatmap.cell(row, col) {
                signal_sum += rssi;
                signal_count += 1;
            }
        }
        let count = component.len() as f64;
        DeadZone {
            severity,
            area_cells: component.len(),
            centroid: SurveyLocation::new(x_sum / count, y_sum / count),
            bbox,
            avg_signal_dbm: (signal_count > 0).then(|| signal_sum / signal_count as f64),
            affected_bssid: heatmap.bssid,
        }
    }

    /// Summarize a detection run
    pub fn generate_report(&self, zones: &[DeadZone]) -> DeadZoneReport {
        let mut report = DeadZoneReport::default();
        for zone in zones {
            report.total_zones += 1;
            report.total_area_cells += zone.area_cells;
            *report.zones_by_severity.entry(zone.severity).or_insert(0) += 1;
        }
        report.has_critical_zones = report
            .zones_by_severity
            .contains_key(&DeadZoneSeverity::Critical);
        report
    }

    /// One remediation action per Critical or High zone
    pub fn suggest_improvements(&self, zones: &[DeadZone]) -> Vec<ImprovementAction> {
        zones
            .iter()
            .filter(|zone| zone.severity >= DeadZoneSeverity::High)
            .map(|zone| ImprovementAction {
                description: format!(
                    "{} dead zone of {} cells near ({:.1}, {:.1}); add coverage or reposition the nearest AP",
                    zone.severity, zone.area_cells, zone.centroid.x, zone.centroid.y
                ),
                priority: zone.severity.priority(),
                location: zone.centroid.clone(),
            })
            .collect()
    }
}

impl Default for DeadZoneDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// 4-neighborhood flood fill over cells of one severity
fn flood_fill(
    severities: &[Vec<Option<DeadZoneSeverity>>],
    visited: &mut [Vec<bool>],
    start_row: usize,
    start_col: usize,
    severity: DeadZoneSeverity,
) -> Vec<(usize, usize)> {
    let height = severities.len();
    let width = severities[0].len();
    let mut component = Vec::new();
    let mut queue = VecDeque::from([(start_row, start_col)]);
    visited[start_row][start_col] = true;
    while let Some((row, col)) = queue.pop_front() {
        component.push((row, col));
        let mut neighbors = Vec::with_capacity(4);
        if row > 0 {
            neighbors.push((row - 1, col));
        }
        if row + 1 < height {
            neighbors.push((row + 1, col));
        }
        if col > 0 {
            neighbors.push((row, col - 1));
        }
        if col + 1 < width {
            neighbors.push((row, col + 1));
        }
        for (r, c) in neighbors {
            if !visited[r][c] && severities[r][c] == Some(severity) {
                visited[r][c] = true;
                queue.push_back((r, c));
            }
        }
    }
    component
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::SurveyBounds;

    fn heatmap_from(cells: Vec<Vec<Option<f64>>>) -> SignalHeatmap {
        let grid_height = cells.len();
        let grid_width = cells.first().map_or(0, Vec::len);
        SignalHeatmap {
            bounds: SurveyBounds::new(
                0.0,
                0.0,
                (grid_width.saturating_sub(1)) as f64,
                (grid_height.saturating_sub(1)) as f64,
            )
            .unwrap(),
            grid_width,
            grid_height,
            resolution_m: 1.0,
            cells,
            measurement_count: 1,
            bssid: None,
        }
    }

    #[test]
    fn uniform_weak_grid_is_one_high_zone() {
        // 10x10 at -95 dBm: below the High bound (-85) but above Critical
        let map = heatmap_from(vec![vec![Some(-95.0); 10]; 10]);
        let detector = DeadZoneDetector::new();
        let zones = detector.detect(&map);
        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        assert_eq!(zone.severity, DeadZoneSeverity::High);
        assert_eq!(zone.area_cells, 100);
        assert_eq!(zone.centroid, SurveyLocation::new(4.5, 4.5));
        assert_eq!(zone.bbox, (0, 9, 0, 9));
        assert_eq!(zone.avg_signal_dbm, Some(-95.0));
    }

    #[test]
    fn well_covered_grid_has_no_zones() {
        let map = heatmap_from(vec![vec![Some(-55.0); 8]; 8]);
        assert!(DeadZoneDetector::new().detect(&map).is_empty());
    }

    #[test]
    fn unknown_cells_are_critical() {
        let mut cells = vec![vec![Some(-55.0); 8]; 8];
        for row in 0..2 {
            for col in 0..2 {
                cells[row][col] = None;
            }
        }
        let zones = DeadZoneDetector::new().detect(&heatmap_from(cells));
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].severity, DeadZoneSeverity::Critical);
        assert_eq!(zones[0].area_cells, 4);
        assert_eq!(zones[0].avg_signal_dbm, None);
    }

    #[test]
    fn small_components_are_noise() {
        let mut cells = vec![vec![Some(-55.0); 8]; 8];
        cells[3][3] = Some(-95.0);
        cells[3][4] = Some(-95.0);
        assert!(DeadZoneDetector::new().detect(&heatmap_from(cells)).is_empty());
    }

    #[test]
    fn diagonal_cells_are_separate_components() {
        // Two 2x2 blocks touching only at a corner stay distinct zones
        // under 4-connectivity
        let mut cells = vec![vec![Some(-55.0); 8]; 8];
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            cells[row][col] = Some(-95.0);
        }
        for (row, col) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            cells[row][col] = Some(-95.0);
        }
        let zones = DeadZoneDetector::new().detect(&heatmap_from(cells));
        assert_eq!(zones.len(), 2);
        assert!(zones.iter().all(|z| z.area_cells == 4));
    }

    #[test]
    fn severities_split_components() {
        // A critical stripe inside a high region forms separate zones
        let mut cells = vec![vec![Some(-95.0); 6]; 6];
        for row in 0..6 {
            cells[row][2] = Some(-99.0);
        }
        let zones = DeadZoneDetector::new().detect(&heatmap_from(cells));
        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].severity, DeadZoneSeverity::Critical);
        assert_eq!(zones[0].area_cells, 6);
        assert!(zones[1..].iter().all(|z| z.severity == DeadZoneSeverity::High));
    }

    #[test]
    fn cropping_away_from_zone_is_stable() {
        let mut cells = vec![vec![Some(-55.0); 10]; 10];
        for row in 1..4 {
            for col in 1..4 {
                cells[row][col] = Some(-92.0);
            }
        }
        let full = DeadZoneDetector::new().detect(&heatmap_from(cells.clone()));
        // Drop rows and columns 6..10, far from the zone
        let cropped_cells: Vec<Vec<Option<f64>>> = cells[..6]
            .iter()
            .map(|row| row[..6].to_vec())
            .collect();
        let cropped = DeadZoneDetector::new().detect(&heatmap_from(cropped_cells));
        assert_eq!(full.len(), cropped.len());
        assert_eq!(full[0].area_cells, cropped[0].area_cells);
        assert_eq!(full[0].bbox, cropped[0].bbox);
        assert_eq!(full[0].severity, cropped[0].severity);
    }

    #[test]
    fn report_and_improvements() {
        let mut cells = vec![vec![Some(-55.0); 10]; 10];
        for row in 0..3 {
            for col in 0..3 {
                cells[row][col] = None; // critical
            }
        }
        for row in 6..10 {
            for col in 6..10 {
                cells[row][col] = Some(-90.0); // high
            }
        }
        let detector = DeadZoneDetector::new();
        let zones = detector.detect(&heatmap_from(cells));
        let report = detector.generate_report(&zones);
        assert_eq!(report.total_zones, 2);
        assert_eq!(report.total_area_cells, 9 + 16);
        assert!(report.has_critical_zones);
        assert_eq!(
            report.zones_by_severity.get(&DeadZoneSeverity::Critical),
            Some(&1)
        );

        let actions = detector.suggest_improvements(&zones);
        assert_eq!(actions.len(), 2);
        // Most severe zone first
        assert_eq!(actions[0].priority, 4);
        assert_eq!(actions[1].priority, 3);
    }
}
