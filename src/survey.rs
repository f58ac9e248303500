//! # Site survey collection
//!
//! Ingests geotagged scan snapshots into immutable survey sessions.
//!
//! ## Available Operations
//! - [`SurveyCollector::create_survey`] - Open a session for one SSID
//! - [`SurveyCollector::add_measurement`] - Record a snapshot at a location,
//!   merging with a nearby earlier measurement when one exists
//! - [`SurveyCollector::complete_survey`] / [`SurveyCollector::abort_survey`] -
//!   Close a session exactly once
//! - [`SurveyCollector::assess_quality`] - Rate how well the area was covered
//! - [`survey_bounds`] - Axis-aligned extent of the measured locations
//! - [`ap_statistics`] - Per-AP sample count, mean RSSI and coverage
//! - [`analyze_survey`] - Summary statistics with textual recommendations
//!
//! Sessions are value objects: every mutator returns a new session and
//! leaves its input untouched. Measurements keep insertion order, merges
//! included.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{NetkitError, NetkitResult};
use crate::types::{Bssid, SignalQuality};

/// Planar survey coordinate in meters, relative to an arbitrary origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyLocation {
    pub x: f64,
    pub y: f64,
    /// Free-form place name ("kitchen", "desk 4")
    pub label: Option<String>,
}

impl SurveyLocation {
    /// Location without a label
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    /// Location with a place name
    pub fn labeled(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: Some(label.into()),
        }
    }

    /// Euclidean distance to another location (m)
    pub fn distance_to(&self, other: &SurveyLocation) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point halfway to another location; keeps this location's label
    pub fn midpoint(&self, other: &SurveyLocation) -> SurveyLocation {
        SurveyLocation {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            label: self.label.clone().or_else(|| other.label.clone()),
        }
    }
}

/// One BSS row inside a scan snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BssReading {
    pub bssid: Bssid,
    pub rssi_dbm: i32,
}

/// All BSSs of one SSID as seen in a single scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkCluster {
    pub ssid: String,
    pub readings: Vec<BssReading>,
}

/// One scan result: every network visible at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub networks: Vec<NetworkCluster>,
    /// BSS the scanning station was associated to, when known
    pub connected_bssid: Option<Bssid>,
}

impl ScanSnapshot {
    fn readings(&self) -> impl Iterator<Item = &BssReading> {
        self.networks.iter().flat_map(|n| n.readings.iter())
    }

    fn has_ssid(&self, ssid: &str) -> bool {
        self.networks
            .iter()
            .any(|n| n.ssid == ssid && !n.readings.is_empty())
    }
}

/// One merged measurement at a survey location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyMeasurement {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub location: SurveyLocation,
    /// Mean RSSI per visible BSS (dBm)
    pub visible_bssids: BTreeMap<Bssid, f64>,
    /// BSS the station was associated to during the scan
    pub connected_bssid: Option<Bssid>,
    /// RSSI of the associated BSS (dBm)
    pub connected_rssi_dbm: Option<f64>,
    /// How many raw snapshots this measurement aggregates
    pub measurement_count: u32,
}

impl SurveyMeasurement {
    /// Strongest visible RSSI, the figure coverage analysis works from
    pub fn best_rssi_dbm(&self) -> Option<f64> {
        self.visible_bssids
            .values()
            .copied()
            .fold(None, |best, rssi| {
                Some(best.map_or(rssi, |b: f64| b.max(rssi)))
            })
    }

    /// Merge with another measurement: midpoint location, per-BSS mean RSSI,
    /// summed counts. Commutative in everything but id and timestamp, which
    /// are kept from `self`.
    pub fn merged_with(&self, other: &SurveyMeasurement) -> SurveyMeasurement {
        let mut visible = self.visible_bssids.clone();
        for (bssid, rssi) in &other.visible_bssids {
            visible
                .entry(*bssid)
                .and_modify(|existing| *existing = (*existing + rssi) / 2.0)
                .or_insert(*rssi);
        }
        SurveyMeasurement {
            id: self.id,
            timestamp: self.timestamp,
            location: self.location.midpoint(&other.location),
            visible_bssids: visible,
            connected_bssid: self.connected_bssid.or(other.connected_bssid),
            connected_rssi_dbm: match (self.connected_rssi_dbm, other.connected_rssi_dbm) {
                (Some(a), Some(b)) => Some((a + b) / 2.0),
                (a, b) => a.or(b),
            },
            measurement_count: self.measurement_count + other.measurement_count,
        }
    }
}

/// Session lifecycle state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum SurveyStatus {
    InProgress,
    Completed,
    Aborted,
}

/// An immutable survey session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySession {
    pub id: Uuid,
    pub name: String,
    /// SSID under survey; snapshots must contain it
    pub ssid: String,
    pub status: SurveyStatus,
    /// Measurements in insertion order, merges included
    pub measurements: Vec<SurveyMeasurement>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// How thoroughly an area was covered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum SurveyQuality {
    Insufficient,
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Axis-aligned extent of a set of survey locations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl SurveyBounds {
    /// Validated construction; rejects inverted extents
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> NetkitResult<Self> {
        if max_x < min_x || max_y < min_y {
            return Err(NetkitError::InvalidBounds {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Per-AP coverage statistics over a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApStatistics {
    /// Measurements in which the BSS was visible
    pub samples: usize,
    /// Mean RSSI over those measurements (dBm)
    pub avg_rssi_dbm: f64,
    /// Fraction of all measurements in which the BSS was visible, 0-1
    pub coverage: f64,
}

/// Measurement ingestion with spatial merging
///
/// Two snapshots recorded within `spatial_resolution_m` of each other are
/// treated as the same place and merged; the default resolution of 1 m suits
/// walk-around indoor surveys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyCollector {
    /// Distance below which measurements merge (m)
    pub spatial_resolution_m: f64,
    /// Distinct locations below which coverage is Insufficient
    pub min_locations: usize,
}

impl SurveyCollector {
    /// Collector with 1 m resolution and a 3-location minimum
    pub fn new() -> Self {
        Self {
            spatial_resolution_m: 1.0,
            min_locations: 3,
        }
    }

    /// Collector with a custom merge resolution
    pub fn with_resolution(spatial_resolution_m: f64) -> NetkitResult<Self> {
        if spatial_resolution_m <= 0.0 || !spatial_resolution_m.is_finite() {
            return Err(NetkitError::InvalidResolution(spatial_resolution_m));
        }
        Ok(Self {
            spatial_resolution_m,
            ..Self::new()
        })
    }

    /// Open a new session in the InProgress state
    pub fn create_survey(
        &self,
        name: &str,
        ssid: &str,
        description: Option<&str>,
    ) -> NetkitResult<SurveySession> {
        if name.trim().is_empty() {
            return Err(NetkitError::BlankField { field: "name" });
        }
        if ssid.trim().is_empty() {
            return Err(NetkitError::BlankField { field: "ssid" });
        }
        info!(name, ssid, "survey started");
        Ok(SurveySession {
            id: Uuid::new_v4(),
            name: name.to_string(),
            ssid: ssid.to_string(),
            status: SurveyStatus::InProgress,
            measurements: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            description: description.map(str::to_string),
        })
    }

    /// Record a snapshot at a location, returning the updated session
    ///
    /// The snapshot must contain at least one BSS under the session's SSID
    /// (case-sensitive). When an earlier measurement lies within the spatial
    /// resolution, the closest one absorbs this snapshot; otherwise the
    /// snapshot is appended as a new measurement.
    pub fn add_measurement(
        &self,
        session: &SurveySession,
        snapshot: &ScanSnapshot,
        location: SurveyLocation,
    ) -> NetkitResult<SurveySession> {
        if session.status != SurveyStatus::InProgress {
            return Err(NetkitError::SessionNotInProgress);
        }
        if !snapshot.has_ssid(&session.ssid) {
            return Err(NetkitError::SsidMismatch {
                ssid: session.ssid.clone(),
            });
        }
        for reading in snapshot.readings() {
            if !(-120..=0).contains(&reading.rssi_dbm) {
                return Err(NetkitError::RssiOutOfRange(reading.rssi_dbm));
            }
        }

        let mut visible = BTreeMap::new();
        for reading in snapshot.readings() {
            visible.insert(reading.bssid, f64::from(reading.rssi_dbm));
        }
        let connected_rssi_dbm = snapshot
            .connected_bssid
            .and_then(|bssid| visible.get(&bssid).copied());
        let incoming = SurveyMeasurement {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            location,
            visible_bssids: visible,
            connected_bssid: snapshot.connected_bssid,
            connected_rssi_dbm,
            measurement_count: 1,
        };

        let mut updated = session.clone();
        match self.closest_within_resolution(session, &incoming.location) {
            Some(index) => {
                debug!(index, "merging measurement into nearby location");
                updated.measurements[index] =
                    updated.measurements[index].merged_with(&incoming);
            }
            None => updated.measurements.push(incoming),
        }
        Ok(updated)
    }

    fn closest_within_resolution(
        &self,
        session: &SurveySession,
        location: &SurveyLocation,
    ) -> Option<usize> {
        session
            .measurements
            .iter()
            .enumerate()
            .map(|(index, m)| (index, m.location.distance_to(location)))
            .filter(|(_, distance)| *distance <= self.spatial_resolution_m)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Mark the session completed, stamping its end time
    pub fn complete_survey(&self, session: &SurveySession) -> NetkitResult<SurveySession> {
        self.close(session, SurveyStatus::Completed)
    }

    /// Mark the session aborted, stamping its end time
    pub fn abort_survey(&self, session: &SurveySession) -> NetkitResult<SurveySession> {
        self.close(session, SurveyStatus::Aborted)
    }

    fn close(&self, session: &SurveySession, status: SurveyStatus) -> NetkitResult<SurveySession> {
        if session.status != SurveyStatus::InProgress {
            return Err(NetkitError::SessionNotInProgress);
        }
        info!(name = %session.name, %status, "survey closed");
        let mut closed = session.clone();
        closed.status = status;
        closed.ended_at = Some(Utc::now());
        Ok(closed)
    }

    /// Rate the coverage of a session by location count and merge depth
    pub fn assess_quality(&self, session: &SurveySession) -> SurveyQuality {
        let locations = session.measurements.len();
        if locations < self.min_locations {
            return SurveyQuality::Insufficient;
        }
        let avg_count = session
            .measurements
            .iter()
            .map(|m| f64::from(m.measurement_count))
            .sum::<f64>()
            / locations as f64;
        if locations >= 10 && avg_count >= 3.0 {
            SurveyQuality::Excellent
        } else if locations >= 6 && avg_count >= 2.0 {
            SurveyQuality::Good
        } else if locations >= 4 {
            SurveyQuality::Fair
        } else {
            SurveyQuality::Poor
        }
    }
}

impl Default for SurveyCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned extent of a session's measured locations
///
/// `None` for a session without measurements.
pub fn survey_bounds(session: &SurveySession) -> Option<SurveyBounds> {
    let first = session.measurements.first()?;
    let mut bounds = SurveyBounds {
        min_x: first.location.x,
        min_y: first.location.y,
        max_x: first.location.x,
        max_y: first.location.y,
    };
    for m in &session.measurements[1..] {
        bounds.min_x = bounds.min_x.min(m.location.x);
        bounds.min_y = bounds.min_y.min(m.location.y);
        bounds.max_x = bounds.max_x.max(m.location.x);
        bounds.max_y = bounds.max_y.max(m.location.y);
    }
    Some(bounds)
}

/// Per-AP sample counts, mean RSSI and coverage fraction over a session
pub fn ap_statistics(session: &SurveySession) -> HashMap<Bssid, ApStatistics> {
    let total = session.measurements.len();
    let mut sums: HashMap<Bssid, (usize, f64)> = HashMap::new();
    for measurement in &session.measurements {
        for (bssid, rssi) in &measurement.visible_bssids {
            let entry = sums.entry(*bssid).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += rssi;
        }
    }
    sums.into_iter()
        .map(|(bssid, (samples, rssi_sum))| {
            (bssid, ApStatistics {
                samples,
                avg_rssi_dbm: rssi_sum / samples as f64,
                coverage: if total == 0 {
                    0.0
                } else {
                    samples as f64 / total as f64
                },
            })
        })
        .collect()
}

/// Summary statistics over a completed (or running) session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnalysis {
    /// Distinct measurement locations
    pub locations: usize,
    /// Mean best-RSSI over locations (dBm)
    pub rssi_avg_dbm: f64,
    /// Weakest best-RSSI (dBm)
    pub rssi_min_dbm: f64,
    /// Strongest best-RSSI (dBm)
    pub rssi_max_dbm: f64,
    /// Standard deviation of best-RSSI (dB)
    pub rssi_std_dev_db: f64,
    /// Location count per quality bucket
    pub quality_distribution: HashMap<SignalQuality, usize>,
    /// Labels (or coordinates) of locations with weak signal
    pub problem_areas: Vec<String>,
    /// Percentage of locations at Fair quality or better, 0-100
    pub coverage_score: u8,
    /// Textual follow-up advice
    pub recommendations: Vec<String>,
}

/// Analyze a session's measurements
///
/// Works from each location's strongest visible RSSI, the figure a station
/// at that spot would roam to.
pub fn analyze_survey(session: &SurveySession) -> SurveyAnalysis {
    let samples: Vec<(&SurveyMeasurement, f64)> = session
        .measurements
        .iter()
        .filter_map(|m| m.best_rssi_dbm().map(|rssi| (m, rssi)))
        .collect();

    if samples.is_empty() {
        return SurveyAnalysis {
            locations: 0,
            rssi_avg_dbm: 0.0,
            rssi_min_dbm: 0.0,
            rssi_max_dbm: 0.0,
            rssi_std_dev_db: 0.0,
            quality_distribution: HashMap::new(),
            problem_areas: Vec::new(),
            coverage_score: 0,
            recommendations: vec!["No measurements collected.".to_string()],
        };
    }

    let values: Vec<f64> = samples.iter().map(|(_, rssi)| *rssi).collect();
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut quality_distribution: HashMap<SignalQuality, usize> = HashMap::new();
    let mut problem_areas = Vec::new();
    let mut covered = 0usize;
    for (measurement, rssi) in &samples {
        let quality = SignalQuality::from_rssi(rssi.round() as i32);
        *quality_distribution.entry(quality).or_insert(0) += 1;
        if quality >= SignalQuality::Fair {
            covered += 1;
        } else {
            problem_areas.push(describe_location(&measurement.location));
        }
    }
    let coverage_score = (covered as f64 / samples.len() as f64 * 100.0).round() as u8;

    let mut recommendations = Vec::new();
    if coverage_score < 70 {
        recommendations
            .push("Coverage is below target; consider adding an access point.".to_string());
    }
    if !problem_areas.is_empty() {
        recommendations.push(format!(
            "Weak signal at {} location(s): {}.",
            problem_areas.len(),
            problem_areas.join(", ")
        ));
    }
    if variance.sqrt() > 10.0 {
        recommendations.push(
            "High signal variability; check for interference or obstructions.".to_string(),
        );
    }
    if coverage_score >= 90 && problem_areas.is_empty() {
        recommendations.push("Coverage is good throughout the surveyed area.".to_string());
    }

    SurveyAnalysis {
        locations: samples.len(),
        rssi_avg_dbm: avg,
        rssi_min_dbm: min,
        rssi_max_dbm: max,
        rssi_std_dev_db: variance.sqrt(),
        quality_distribution,
        problem_areas,
        coverage_score,
        recommendations,
    }
}

fn describe_location(location: &SurveyLocation) -> String {
    match &location.label {
        Some(label) => label.clone(),
        None => format!("({:.1}, {:.1})", location.x, location.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bssid(last: u8) -> Bssid {
        Bssid::new([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    fn snapshot(ssid: &str, readings: &[(u8, i32)]) -> ScanSnapshot {
        ScanSnapshot {
            networks: vec![NetworkCluster {
                ssid: ssid.to_string(),
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

    #[test]
    fn create_survey_validates_fields() {
        let collector = SurveyCollector::new();
        assert_eq!(
            collector.create_survey("  ", "Office", None),
            Err(NetkitError::BlankField { field: "name" })
        );
        assert_eq!(
            collector.create_survey("Walkthrough", "", None),
            Err(NetkitError::BlankField { field: "ssid" })
        );
        let session = collector
            .create_survey("Walkthrough", "Office", Some("ground floor"))
            .unwrap();
        assert_eq!(session.status, SurveyStatus::InProgress);
        assert_eq!(session.description.as_deref(), Some("ground floor"));
        assert!(session.measurements.is_empty());
    }

    #[test]
    fn snapshot_must_contain_session_ssid() {
        let collector = SurveyCollector::new();
        let session = collector.create_survey("s", "Office", None).unwrap();
        let result = collector.add_measurement(
            &session,
            &snapshot("office", &[(1, -50)]),
            SurveyLocation::new(0.0, 0.0),
        );
        assert!(matches!(result, Err(NetkitError::SsidMismatch { .. })));
        // Original session untouched
        assert!(session.measurements.is_empty());
    }

    #[test]
    fn out_of_range_rssi_rejected() {
        let collector = SurveyCollector::new();
        let session = collector.create_survey("s", "Office", None).unwrap();
        let result = collector.add_measurement(
            &session,
            &snapshot("Office", &[(1, -121)]),
            SurveyLocation::new(0.0, 0.0),
        );
        assert_eq!(result, Err(NetkitError::RssiOutOfRange(-121)));
    }

    #[test]
    fn distant_measurements_append_in_order() {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("s", "Office", None).unwrap();
        for (i, x) in [0.0, 5.0, 10.0].iter().enumerate() {
            session = collector
                .add_measurement(
                    &session,
                    &snapshot("Office", &[(1, -50 - i as i32)]),
                    SurveyLocation::new(*x, 0.0),
                )
                .unwrap();
        }
        assert_eq!(session.measurements.len(), 3);
        let xs: Vec<f64> = session.measurements.iter().map(|m| m.location.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn nearby_measurement_merges_with_closest() {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("s", "Office", None).unwrap();
        session = collector
            .add_measurement(
                &session,
                &snapshot("Office", &[(1, -50)]),
                SurveyLocation::new(0.0, 0.0),
            )
            .unwrap();
        session = collector
            .add_measurement(
                &session,
                &snapshot("Office", &[(1, -60)]),
                SurveyLocation::new(0.6, 0.0),
            )
            .unwrap();
        assert_eq!(session.measurements.len(), 1);
        let merged = &session.measurements[0];
        assert_eq!(merged.location.x, 0.3);
        assert_eq!(merged.visible_bssids.get(&bssid(1)), Some(&-55.0));
        assert_eq!(merged.measurement_count, 2);
    }

    #[test]
    fn merge_keeps_unshared_bssids() {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("s", "Office", None).unwrap();
        session = collector
            .add_measurement(
                &session,
                &snapshot("Office", &[(1, -50)]),
                SurveyLocation::new(0.0, 0.0),
            )
            .unwrap();
        session = collector
            .add_measurement(
                &session,
                &snapshot("Office", &[(1, -54), (2, -70)]),
                SurveyLocation::new(0.2, 0.0),
            )
            .unwrap();
        let merged = &session.measurements[0];
        assert_eq!(merged.visible_bssids.get(&bssid(1)), Some(&-52.0));
        assert_eq!(merged.visible_bssids.get(&bssid(2)), Some(&-70.0));
    }

    #[test]
    fn merge_count_is_additive_and_symmetric() {
        let a = SurveyMeasurement {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            location: SurveyLocation::new(0.0, 0.0),
            visible_bssids: BTreeMap::from([(bssid(1), -50.0)]),
            connected_bssid: None,
            connected_rssi_dbm: None,
            measurement_count: 3,
        };
        let b = SurveyMeasurement {
            measurement_count: 5,
            ..a.clone()
        };
        let ab = a.merged_with(&b);
        let ba = b.merged_with(&a);
        assert_eq!(ab.measurement_count, 8);
        assert_eq!(ba.measurement_count, 8);
        assert_eq!(ab.location, ba.location);
        assert_eq!(ab.visible_bssids, ba.visible_bssids);
    }

    #[test]
    fn lifecycle_is_single_transition() {
        let collector = SurveyCollector::new();
        let session = collector.create_survey("s", "Office", None).unwrap();
        let completed = collector.complete_survey(&session).unwrap();
        assert_eq!(completed.status, SurveyStatus::Completed);
        assert!(completed.ended_at.is_some());
        assert_eq!(
            collector.complete_survey(&completed),
            Err(NetkitError::SessionNotInProgress)
        );
        assert_eq!(
            collector.abort_survey(&completed),
            Err(NetkitError::SessionNotInProgress)
        );
        let result = collector.add_measurement(
            &completed,
            &snapshot("Office", &[(1, -50)]),
            SurveyLocation::new(0.0, 0.0),
        );
        assert_eq!(result, Err(NetkitError::SessionNotInProgress));
    }

    #[test]
    fn quality_assessment_tiers() {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("s", "Office", None).unwrap();
        assert_eq!(
            collector.assess_quality(&session),
            SurveyQuality::Insufficient
        );
        for x in 0..12 {
            // Three snapshots per spot for a deep merge
            for _ in 0..3 {
                session = collector
                    .add_measurement(
                        &session,
                        &snapshot("Office", &[(1, -50)]),
                        SurveyLocation::new(f64::from(x) * 5.0, 0.0),
                    )
                    .unwrap();
            }
        }
        assert_eq!(collector.assess_quality(&session), SurveyQuality::Excellent);
    }

    #[test]
    fn bounds_and_statistics() {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("s", "Office", None).unwrap();
        assert_eq!(survey_bounds(&session), None);
        for (x, y) in [(0.0, 0.0), (10.0, 4.0), (-2.0, 8.0)] {
            session = collector
                .add_measurement(
                    &session,
                    &snapshot("Office", &[(1, -50)]),
                    SurveyLocation::new(x, y),
                )
                .unwrap();
        }
        let bounds = survey_bounds(&session).unwrap();
        assert_eq!((bounds.min_x, bounds.max_x), (-2.0, 10.0));
        assert_eq!((bounds.min_y, bounds.max_y), (0.0, 8.0));

        let stats = ap_statistics(&session);
        let ap = stats.get(&bssid(1)).unwrap();
        assert_eq!(ap.samples, 3);
        assert_eq!(ap.avg_rssi_dbm, -50.0);
        assert_eq!(ap.coverage, 1.0);
    }

    #[test]
    fn analysis_flags_problem_areas() {
        let collector = SurveyCollector::new();
        let mut session = collector.create_survey("s", "Office", None).unwrap();
        session = collector
            .add_measurement(
                &session,
                &snapshot("Office", &[(1, -45)]),
                SurveyLocation::labeled(0.0, 0.0, "lobby"),
            )
            .unwrap();
        session = collector
            .add_measurement(
                &session,
                &snapshot("Office", &[(1, -88)]),
                SurveyLocation::labeled(20.0, 0.0, "storage"),
            )
            .unwrap();
        let analysis = analyze_survey(&session);
        assert_eq!(analysis.locations, 2);
        assert_eq!(analysis.coverage_score, 50);
        assert_eq!(analysis.problem_areas, vec!["storage".to_string()]);
        assert_eq!(analysis.rssi_max_dbm, -45.0);
        assert_eq!(analysis.rssi_min_dbm, -88.0);
        assert!(!analysis.recommendations.is_empty());
    }

    #[test]
    fn empty_analysis() {
        let collector = SurveyCollector::new();
        let session = collector.create_survey("s", "Office", None).unwrap();
        let analysis = analyze_survey(&session);
        assert_eq!(analysis.locations, 0);
        assert_eq!(analysis.coverage_score, 0);
    }
}
