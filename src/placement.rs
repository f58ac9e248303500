//! # AP placement recommendations
//!
//! Runs a survey session through the heatmap, dead-zone and planning stages
//! and folds the results into one actionable [`PlacementRecommendation`].
//!
//! New APs are proposed at the centroids of serious dead zones, APs seen in
//! too few survey spots are flagged for repositioning, and the channel and
//! power plans come from the optimizers in [`crate::planner`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::deadzone::{DeadZone, DeadZoneDetector, DeadZoneSeverity};
use crate::error::{NetkitError, NetkitResult};
use crate::heatmap::{HeatmapBuilder, HeatmapConfig, SignalHeatmap};
use crate::planner::{
    ApChannelRequest, ChannelAssignment, ChannelPlanner, PowerAdjustment, RegulatoryDomain,
    TxPowerOptimizer, TxPowerRequest,
};
use crate::survey::{SurveyLocation, SurveySession, ap_statistics, survey_bounds};
use crate::types::Bssid;

/// Rough deployment cost of acting on a recommendation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum CostLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl CostLevel {
    /// Cost of installing `new_ap_count` additional APs
    fn from_new_ap_count(new_ap_count: usize) -> CostLevel {
        match new_ap_count {
            0 => CostLevel::Minimal,
            1 => CostLevel::Low,
            2..=3 => CostLevel::Medium,
            _ => CostLevel::High,
        }
    }
}

/// Proposal to install a new AP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApSuggestion {
    /// Where to put it (a dead-zone centroid)
    pub location: SurveyLocation,
    /// Severity of the zone the AP would fix
    pub severity: DeadZoneSeverity,
    pub reason: String,
}

/// Proposal to move an existing AP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositionSuggestion {
    pub bssid: Bssid,
    /// Fraction of survey spots that saw the AP, 0-1
    pub coverage: f64,
    pub reason: String,
}

/// Combined output of the planning pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecommendation {
    /// Fraction of grid cells with acceptable signal, 0-100
    pub current_coverage_pct: f64,
    /// Coverage the plan aims for, 0-100
    pub target_coverage_pct: f64,
    pub dead_zones: Vec<DeadZone>,
    pub new_ap_suggestions: Vec<NewApSuggestion>,
    pub reposition_suggestions: Vec<RepositionSuggestion>,
    pub power_adjustments: Vec<PowerAdjustment>,
    pub channel_assignments: Vec<ChannelAssignment>,
    /// Overall plan score: coverage discounted by critical zones, 0-100
    pub score: u8,
    pub cost_level: CostLevel,
}

/// End-to-end planning over a survey session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementAdvisor {
    pub heatmap_config: HeatmapConfig,
    pub detector: DeadZoneDetector,
    pub channel_planner: ChannelPlanner,
    pub power_optimizer: TxPowerOptimizer,
    /// Coverage goal in percent
    pub target_coverage_pct: f64,
    /// APs visible in fewer than this fraction of spots get a reposition
    /// suggestion, 0-1
    pub reposition_coverage_threshold: f64,
}

impl PlacementAdvisor {
    /// Advisor with default stages for a regulatory domain
    pub fn new(domain: RegulatoryDomain) -> Self {
        Self {
            heatmap_config: HeatmapConfig::new(),
            detector: DeadZoneDetector::new(),
            channel_planner: ChannelPlanner::new(domain),
            power_optimizer: TxPowerOptimizer::new(domain),
            target_coverage_pct: 90.0,
            reposition_coverage_threshold: 0.4,
        }
    }

    /// Produce a recommendation for a surveyed area
    ///
    /// The session must contain at least one measurement. Channel and power
    /// requests describe the APs under the operator's control; both may be
    /// empty when only coverage advice is wanted.
    pub fn recommend(
        &self,
        session: &SurveySession,
        channel_requests: &[ApChannelRequest],
        power_requests: &[TxPowerRequest],
    ) -> NetkitResult<PlacementRecommendation> {
        let bounds = survey_bounds(session).ok_or(NetkitError::EmptySurvey)?;
        let builder = HeatmapBuilder::new(self.heatmap_config)?;
        let heatmap = builder.build_combined(&session.measurements, bounds);

        let dead_zones = self.detector.detect(&heatmap);
        let current_coverage_pct = self.coverage_pct(&heatmap);

        let new_ap_suggestions: Vec<NewApSuggestion> = dead_zones
            .iter()
            .filter(|zone| zone.severity >= DeadZoneSeverity::High)
            .map(|zone| NewApSuggestion {
                location: zone.centroid.clone(),
                severity: zone.severity,
                reason: format!(
                    "{} dead zone covering {} cells",
                    zone.severity, zone.area_cells
                ),
            })
            .collect();

        let mut reposition_suggestions: Vec<RepositionSuggestion> = ap_statistics(session)
            .into_iter()
            .filter(|(_, stats)| stats.coverage < self.reposition_coverage_threshold)
            .map(|(bssid, stats)| RepositionSuggestion {
                bssid,
                coverage: stats.coverage,
                reason: format!(
                    "visible in {:.0}% of survey spots; move it toward the coverage gap",
                    stats.coverage * 100.0
                ),
            })
            .collect();
        reposition_suggestions.sort_by(|a, b| a.bssid.cmp(&b.bssid));

        let channel_assignments = self.channel_planner.optimize(channel_requests);
        let power_adjustments: Vec<PowerAdjustment> = power_requests
            .iter()
            .map(|request| self.power_optimizer.optimize(request))
            .collect();

        let critical_zones = dead_zones
            .iter()
            .filter(|zone| zone.severity == DeadZoneSeverity::Critical)
            .count();
        let score = (current_coverage_pct - 10.0 * critical_zones as f64).clamp(0.0, 100.0);
        let cost_level = CostLevel::from_new_ap_count(new_ap_suggestions.len());

        info!(
            coverage = current_coverage_pct,
            zones = dead_zones.len(),
            score,
            "placement recommendation ready"
        );
        Ok(PlacementRecommendation {
            current_coverage_pct,
            target_coverage_pct: self.target_coverage_pct,
            dead_zones,
            new_ap_suggestions,
            reposition_suggestions,
            power_adjustments,
            channel_assignments,
            score: score.round() as u8,
            cost_level,
        })
    }

    /// Percentage of grid cells with signal above every dead-zone bound
    fn coverage_pct(&self, heatmap: &SignalHeatmap) -> f64 {
        let total = heatmap.grid_width * heatmap.grid_height;
        if total == 0 {
            return 0.0;
        }
        let covered = (0..heatmap.grid_height)
            .flat_map(|row| (0..heatmap.grid_width).map(move |col| (row, col)))
            .filter(|&(row, col)| {
                heatmap
                    .cell(row, col)
                    .is_some_and(|rssi| rssi > self.detector.thresholds.low_dbm)
            })
            .count();
        covered as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{BssReading, NetworkCluster, ScanSnapshot, SurveyCollector};

    fn bssid(last: u8) -> Bssid {
        Bssid::new([0x02, 0, 0, 0, 0, last])
    }

    fn snapshot(readings: &[(u8, i32)]) -> ScanSnapshot {
        ScanSnapshot {
            networks: vec![NetworkCluster {
                ssid: "Office".to_string(),
                readings: readings
                    .iter()
                    .map(|(last, rssi)| BssReading {
                        bssid: bssid(*last),
                        rssi_dbm: *rssi,
                    })
                    .collect(),
            }],
            connected_bssid: None,
        }
    }

    fn surveyed_session(spots: &[(f64, f64, i32)]) -> crate::survey::SurveySession {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("plan", "Office", None).unwrap();
        for (x, y, rssi) in spots {
            session = collector
                .add_measurement(
                    &session,
                    &snapshot(&[(1, *rssi)]),
                    SurveyLocation::new(*x, *y),
                )
                .unwrap();
        }
        session
    }

    #[test]
    fn empty_session_is_rejected() {
        let advisor = PlacementAdvisor::new(RegulatoryDomain::Fcc);
        let collector = SurveyCollector::new();
        let session = collector.create_survey("plan", "Office", None).unwrap();
        assert_eq!(
            advisor.recommend(&session, &[], &[]),
            Err(NetkitError::EmptySurvey)
        );
    }

    #[test]
    fn healthy_area_scores_high_with_minimal_cost() {
        let advisor = PlacementAdvisor::new(RegulatoryDomain::Fcc);
        let spots: Vec<(f64, f64, i32)> = (0..5)
            .flat_map(|x| (0..5).map(move |y| (f64::from(x) * 2.0, f64::from(y) * 2.0, -50)))
            .collect();
        let session = surveyed_session(&spots);
        let rec = advisor.recommend(&session, &[], &[]).unwrap();
        assert_eq!(rec.current_coverage_pct, 100.0);
        assert_eq!(rec.score, 100);
        assert!(rec.dead_zones.is_empty());
        assert!(rec.new_ap_suggestions.is_empty());
        assert_eq!(rec.cost_level, CostLevel::Minimal);
    }

    #[test]
    fn weak_corner_drives_new_ap_suggestion() {
        let advisor = PlacementAdvisor::new(RegulatoryDomain::Fcc);
        // Good signal on the left half, bad on the right half
        let mut spots = Vec::new();
        for x in 0..5 {
            for y in 0..5 {
                spots.push((f64::from(x) * 2.0, f64::from(y) * 2.0, -50));
            }
        }
        for x in 10..15 {
            for y in 0..5 {
                spots.push((f64::from(x) * 2.0, f64::from(y) * 2.0, -92));
            }
        }
        let session = surveyed_session(&spots);
        let rec = advisor.recommend(&session, &[], &[]).unwrap();
        assert!(!rec.dead_zones.is_empty());
        assert!(!rec.new_ap_suggestions.is_empty());
        assert!(rec.current_coverage_pct < 100.0);
        // The proposed AP sits in the weak half
        assert!(rec.new_ap_suggestions[0].location.x > 10.0);
        assert!(rec.cost_level > CostLevel::Minimal);
    }

    #[test]
    fn sparse_ap_gets_reposition_suggestion() {
        let advisor = PlacementAdvisor::new(RegulatoryDomain::Fcc);
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("plan", "Office", None).unwrap();
        // AP 1 everywhere, AP 2 in one spot out of ten
        for i in 0..10 {
            let readings: Vec<(u8, i32)> = if i == 0 {
                vec![(1, -50), (2, -70)]
            } else {
                vec![(1, -50)]
            };
            session = collector
                .add_measurement(
                    &session,
                    &snapshot(&readings),
                    SurveyLocation::new(f64::from(i) * 3.0, 0.0),
                )
                .unwrap();
        }
        let rec = advisor.recommend(&session, &[], &[]).unwrap();
        assert_eq!(rec.reposition_suggestions.len(), 1);
        assert_eq!(rec.reposition_suggestions[0].bssid, bssid(2));
        assert!(rec.reposition_suggestions[0].coverage < 0.4);
    }

    #[test]
    fn plans_flow_through() {
        let advisor = PlacementAdvisor::new(RegulatoryDomain::Fcc);
        let session = surveyed_session(&[(0.0, 0.0, -50), (4.0, 0.0, -52), (8.0, 0.0, -54)]);
        let channel_request = ApChannelRequest {
            bssid: bssid(1),
            band: crate::types::WifiBand::Band2_4GHz,
            supports_dfs: false,
            neighbors: Vec::new(),
            utilization: Default::default(),
        };
        let power_request = TxPowerRequest {
            bssid: bssid(1),
            band: crate::types::WifiBand::Band2_4GHz,
            freq_mhz: 2437,
            current_power_dbm: 20.0,
            coverage_radius_m: 10.0,
            neighbor_count: 0,
        };
        let rec = advisor
            .recommend(&session, &[channel_request], &[power_request])
            .unwrap();
        assert_eq!(rec.channel_assignments.len(), 1);
        assert_eq!(rec.power_adjustments.len(), 1);
        assert_eq!(rec.target_coverage_pct, 90.0);
    }

    #[test]
    fn cost_levels_scale_with_new_aps() {
        assert_eq!(CostLevel::from_new_ap_count(0), CostLevel::Minimal);
        assert_eq!(CostLevel::from_new_ap_count(1), CostLevel::Low);
        assert_eq!(CostLevel::from_new_ap_count(3), CostLevel::Medium);
        assert_eq!(CostLevel::from_new_ap_count(4), CostLevel::High);
    }
}
