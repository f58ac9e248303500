//! # Channel and transmit-power planning
//!
//! Scores candidate channels against the observed neighborhood, assigns
//! channels greedily across a set of APs under regulatory constraints, and
//! trims transmit power until predicted interference is acceptable while a
//! coverage floor still holds.
//!
//! ## Available Operations
//! - [`ChannelPlanner::score_channel`] - Score one candidate channel
//! - [`ChannelPlanner::optimize`] - Greedy global channel assignment
//! - [`TxPowerOptimizer::optimize`] - Power recommendation for one AP
//! - [`RegulatoryDomain`] - Per-domain channel and EIRP tables
//!
//! Scoring is deterministic: 100 minus 20 per co-channel neighbor, 10 per
//! neighbor within two channels, a DFS-risk penalty of 15/10/5 and the
//! observed channel utilization scaled to 20 points.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::rf_tables::path_loss_db;
use crate::types::{Bssid, WifiBand};

/// Regulatory domain governing channel availability and power limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum RegulatoryDomain {
    /// United States
    #[strum(serialize = "FCC")]
    Fcc,
    /// Europe
    #[strum(serialize = "ETSI")]
    Etsi,
    /// Japan
    #[strum(serialize = "MKK")]
    Mkk,
    /// China
    #[strum(serialize = "CN")]
    Cn,
    /// Conservative fallback for unknown regions
    #[strum(serialize = "ROW")]
    RestOfWorld,
}

/// Radar-avoidance exposure of a 5 GHz channel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum DfsRisk {
    None,
    Low,
    Medium,
    High,
}

impl RegulatoryDomain {
    /// Usable 2.4 GHz channels
    pub fn channels_2_4ghz(&self) -> Vec<u16> {
        match self {
            RegulatoryDomain::Fcc | RegulatoryDomain::RestOfWorld => (1..=11).collect(),
            RegulatoryDomain::Etsi | RegulatoryDomain::Mkk | RegulatoryDomain::Cn => {
                (1..=13).collect()
            }
        }
    }

    /// 5 GHz channels usable without radar detection
    pub fn channels_5ghz_non_dfs(&self) -> Vec<u16> {
        match self {
            RegulatoryDomain::Fcc | RegulatoryDomain::Cn => {
                vec![36, 40, 44, 48, 149, 153, 157, 161, 165]
            }
            RegulatoryDomain::Etsi | RegulatoryDomain::Mkk => vec![36, 40, 44, 48],
            RegulatoryDomain::RestOfWorld => vec![36, 40, 44, 48],
        }
    }

    /// 5 GHz channels gated on DFS support
    pub fn channels_5ghz_dfs(&self) -> Vec<u16> {
        match self {
            RegulatoryDomain::Cn => vec![52, 56, 60, 64],
            _ => vec![
                52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140,
            ],
        }
    }

    /// Preferred-scanning channels on 6 GHz; empty where the band is closed
    pub fn channels_6ghz_psc(&self) -> Vec<u16> {
        match self {
            RegulatoryDomain::Fcc => vec![
                5, 21, 37, 53, 69, 85, 101, 117, 133, 149, 165, 181, 197, 213, 229,
            ],
            // Lower 6 GHz block only
            RegulatoryDomain::Etsi | RegulatoryDomain::Mkk => vec![5, 21, 37, 53, 69, 85],
            RegulatoryDomain::Cn | RegulatoryDomain::RestOfWorld => Vec::new(),
        }
    }

    /// Maximum EIRP per band (dBm)
    pub fn max_eirp_dbm(&self, band: WifiBand) -> i32 {
        match (self, band) {
            (RegulatoryDomain::Fcc, WifiBand::Band2_4GHz) => 36,
            (RegulatoryDomain::Fcc, WifiBand::Band5GHz) => 30,
            (RegulatoryDomain::Fcc, WifiBand::Band6GHz) => 30,
            (RegulatoryDomain::Etsi, WifiBand::Band2_4GHz) => 20,
            (RegulatoryDomain::Etsi, WifiBand::Band5GHz) => 23,
            (RegulatoryDomain::Etsi, WifiBand::Band6GHz) => 23,
            (RegulatoryDomain::Mkk, WifiBand::Band2_4GHz) => 20,
            (RegulatoryDomain::Mkk, WifiBand::Band5GHz) => 23,
            (RegulatoryDomain::Mkk, WifiBand::Band6GHz) => 23,
            (RegulatoryDomain::Cn, WifiBand::Band2_4GHz) => 20,
            (RegulatoryDomain::Cn, WifiBand::Band5GHz) => 23,
            (RegulatoryDomain::Cn, WifiBand::Band6GHz) => 23,
            (RegulatoryDomain::RestOfWorld, _) => 20,
        }
    }

    /// Channels usable for planning on a band
    pub fn available_channels(&self, band: WifiBand, supports_dfs: bool) -> Vec<u16> {
        match band {
            WifiBand::Band2_4GHz => self.channels_2_4ghz(),
            WifiBand::Band5GHz => {
                let mut channels = self.channels_5ghz_non_dfs();
                if supports_dfs {
                    channels.extend(self.channels_5ghz_dfs());
                    channels.sort_unstable();
                }
                channels
            }
            WifiBand::Band6GHz => self.channels_6ghz_psc(),
        }
    }

    /// DFS exposure of a 5 GHz channel
    ///
    /// The weather-radar block (120-128) carries the highest abandonment
    /// risk; the remaining UNII-2C/2E channels are moderate and UNII-2A
    /// (52-64) is mild. Non-DFS channels carry none.
    pub fn dfs_risk(&self, band: WifiBand, channel: u16) -> DfsRisk {
        if band != WifiBand::Band5GHz || !self.channels_5ghz_dfs().contains(&channel) {
            return DfsRisk::None;
        }
        match channel {
            120 | 124 | 128 => DfsRisk::High,
            100..=140 => DfsRisk::Medium,
            _ => DfsRisk::Low,
        }
    }
}

/// One neighboring BSS as heard by the AP being planned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborBss {
    pub bssid: Bssid,
    pub channel: u16,
    pub rssi_dbm: i32,
}

/// Channel-planning input for one AP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApChannelRequest {
    pub bssid: Bssid,
    pub band: WifiBand,
    pub supports_dfs: bool,
    /// Every foreign BSS the AP can hear
    pub neighbors: Vec<NeighborBss>,
    /// Observed airtime utilization per channel, 0-1
    pub utilization: HashMap<u16, f64>,
}

/// One channel decision from the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    pub bssid: Bssid,
    pub channel: u16,
    pub score: i32,
    pub dfs_risk: DfsRisk,
}

/// Greedy channel assignment under regulatory constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPlanner {
    pub domain: RegulatoryDomain,
    /// Cap on how many planned APs may share one channel
    pub max_aps_per_channel: usize,
    /// Channels the operator has ruled out
    pub excluded_channels: Vec<u16>,
}

impl ChannelPlanner {
    /// Planner with a 3-AP-per-channel cap and no exclusions
    pub fn new(domain: RegulatoryDomain) -> Self {
        Self {
            domain,
            max_aps_per_channel: 3,
            excluded_channels: Vec::new(),
        }
    }

    /// Score a candidate channel for one AP
    pub fn score_channel(
        &self,
        channel: u16,
        band: WifiBand,
        neighbors: &[NeighborBss],
        utilization: f64,
    ) -> i32 {
        let co_channel = neighbors.iter().filter(|n| n.channel == channel).count() as i32;
        let adjacent = neighbors
            .iter()
            .filter(|n| n.channel != channel && n.channel.abs_diff(channel) <= 2)
            .count() as i32;
        let dfs_penalty = match self.domain.dfs_risk(band, channel) {
            DfsRisk::High => 15,
            DfsRisk::Medium => 10,
            DfsRisk::Low => 5,
            DfsRisk::None => 0,
        };
        100 - 20 * co_channel - 10 * adjacent - dfs_penalty
            - (utilization.clamp(0.0, 1.0) * 20.0).round() as i32
    }

    /// Legal candidate channels for a request
    pub fn legal_channels(&self, band: WifiBand, supports_dfs: bool) -> Vec<u16> {
        self.domain
            .available_channels(band, supports_dfs)
            .into_iter()
            .filter(|channel| !self.excluded_channels.contains(channel))
            .collect()
    }

    /// Assign channels across a set of APs
    ///
    /// APs with the most neighbors choose first. Each picks its
    /// highest-scoring legal channel, ties broken toward the lowest channel
    /// number; channels already chosen by `max_aps_per_channel` peers are
    /// unavailable unless every legal channel is saturated.
    pub fn optimize(&self, requests: &[ApChannelRequest]) -> Vec<ChannelAssignment> {
        let mut order: Vec<usize> = (0..requests.len()).collect();
        order.sort_by_key(|&index| std::cmp::Reverse(requests[index].neighbors.len()));

        let mut load: HashMap<(WifiBand, u16), usize> = HashMap::new();
        let mut assignments = Vec::with_capacity(requests.len());
        for index in order {
            let request = &requests[index];
            let legal = self.legal_channels(request.band, request.supports_dfs);
            if legal.is_empty() {
                debug!(bssid = %request.bssid, "no legal channel for request");
                continue;
            }
            let open: Vec<u16> = legal
                .iter()
                .copied()
                .filter(|ch| {
                    load.get(&(request.band, *ch)).copied().unwrap_or(0) < self.max_aps_per_channel
                })
                .collect();
            let candidates = if open.is_empty() { legal } else { open };

            let mut best_channel = candidates[0];
            let mut best_score = i32::MIN;
            for &channel in &candidates {
                let utilization = request.utilization.get(&channel).copied().unwrap_or(0.0);
                let score =
                    self.score_channel(channel, request.band, &request.neighbors, utilization);
                if score > best_score || (score == best_score && channel < best_channel) {
                    best_score = score;
                    best_channel = channel;
                }
            }
            *load.entry((request.band, best_channel)).or_insert(0) += 1;
            info!(bssid = %request.bssid, channel = best_channel, score = best_score, "assigned channel");
            assignments.push(ChannelAssignment {
                bssid: request.bssid,
                channel: best_channel,
                score: best_score,
                dfs_risk: self.domain.dfs_risk(request.band, best_channel),
            });
        }
        assignments
    }
}

/// Transmit-power policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TxPowerConfig {
    /// RSSI the coverage edge should see (dBm)
    pub target_rssi_dbm: f64,
    /// RSSI floor below which coverage counts as lost (dBm)
    pub min_rssi_dbm: f64,
    /// Predicted interference above this triggers power reduction, 0-1
    pub max_interference: f64,
}

impl TxPowerConfig {
    /// -65 dBm target, -75 dBm floor, 0.4 interference ceiling
    pub fn new() -> Self {
        Self {
            target_rssi_dbm: -65.0,
            min_rssi_dbm: -75.0,
            max_interference: 0.4,
        }
    }
}

impl Default for TxPowerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Power-planning input for one AP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxPowerRequest {
    pub bssid: Bssid,
    pub band: WifiBand,
    pub freq_mhz: u32,
    pub current_power_dbm: f64,
    /// Distance to the farthest spot the AP must cover (m)
    pub coverage_radius_m: f64,
    /// Co-channel and adjacent APs in earshot
    pub neighbor_count: usize,
}

/// One power decision from the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAdjustment {
    pub bssid: Bssid,
    pub current_power_dbm: f64,
    pub recommended_power_dbm: f64,
    /// Positive means turn power up
    pub delta_db: f64,
    /// Predicted interference at the recommended power, 0-1
    pub predicted_interference: f64,
}

/// Power recommendation under an interference budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TxPowerOptimizer {
    pub config: TxPowerConfig,
    pub domain: RegulatoryDomain,
}

/// Power-reduction step size (dB)
const POWER_STEP_DB: f64 = 3.0;

impl TxPowerOptimizer {
    pub fn new(domain: RegulatoryDomain) -> Self {
        Self {
            config: TxPowerConfig::new(),
            domain,
        }
    }

    /// EIRP needed for the coverage edge to see the target RSSI (dBm)
    pub fn required_eirp_dbm(&self, band: WifiBand, freq_mhz: u32, distance_m: f64) -> f64 {
        self.config.target_rssi_dbm + path_loss_db(freq_mhz, band, distance_m)
    }

    /// Predicted interference contribution of an AP, 0-1
    ///
    /// Grows with transmit power and neighborhood density; the 2.4 GHz band
    /// weighs heaviest because its channels overlap.
    pub fn interference(&self, power_dbm: f64, band: WifiBand, neighbor_count: usize) -> f64 {
        let band_factor = match band {
            WifiBand::Band2_4GHz => 1.0,
            WifiBand::Band5GHz => 0.8,
            WifiBand::Band6GHz => 0.6,
        };
        ((0.2 + (power_dbm - 20.0) / 10.0 * 0.3 + neighbor_count as f64 / 10.0 * 0.3)
            * band_factor)
            .clamp(0.0, 1.0)
    }

    /// Recommend a power level for one AP
    ///
    /// Starts from the EIRP required at the coverage edge (capped by the
    /// domain limit), then backs off in 3 dB steps while interference
    /// exceeds the budget and the coverage floor still holds.
    pub fn optimize(&self, request: &TxPowerRequest) -> PowerAdjustment {
        let limit = f64::from(self.domain.max_eirp_dbm(request.band));
        let path_loss = path_loss_db(request.freq_mhz, request.band, request.coverage_radius_m);
        let mut power = self
            .required_eirp_dbm(request.band, request.freq_mhz, request.coverage_radius_m)
            .min(limit);

        while self.interference(power, request.band, request.neighbor_count)
            > self.config.max_interference
            && (power - POWER_STEP_DB) - path_loss >= self.config.min_rssi_dbm
        {
            power -= POWER_STEP_DB;
        }

        let predicted = self.interference(power, request.band, request.neighbor_count);
        debug!(bssid = %request.bssid, power, predicted, "power recommendation");
        PowerAdjustment {
            bssid: request.bssid,
            current_power_dbm: request.current_power_dbm,
            recommended_power_dbm: power,
            delta_db: power - request.current_power_dbm,
            predicted_interference: predicted,
        }
    }
}
