//! # NetKit — passive Wi-Fi observation analytics
//!
//! NetKit turns raw 802.11 management-frame data and geotagged RSSI
//! measurements into a typed capability model, RF link estimates and
//! network-planning recommendations. The crate is a pure library: it performs
//! no scanning, no packet capture and no I/O. Platform scan adapters feed it
//! and higher layers render its outputs.
//!
//! ## Subsystems
//!
//! ### Information Elements
//! - [`ie::parse_information_elements`] - Decode a set of beacon/probe-response IEs
//!   into one [`ie::ParsedInformationElements`] record (WiFi 4/5/6/6E/7 capabilities,
//!   security posture, WPS)
//!
//! ### RF link model
//! - [`rf_link::snr`] - Signal-to-noise ratio from RSSI and band noise floor
//! - [`rf_link::max_achievable_mcs`] - Highest MCS sustainable at a given SNR
//! - [`rf_link::phy_rate_mbps`] - PHY rate for (MCS, standard, width, NSS)
//! - [`rf_link::analyze_bss`] - Full per-BSS metrics record
//!
//! ### Coverage and planning
//! - [`survey::SurveyCollector`] - Geotagged measurement ingestion with spatial merge
//! - [`heatmap::HeatmapBuilder`] - Grid interpolation (nearest / IDW / bilinear)
//! - [`deadzone::DeadZoneDetector`] - Connected-component coverage-gap detection
//! - [`planner::ChannelPlanner`] / [`planner::TxPowerOptimizer`] - Channel and power plans
//! - [`placement::PlacementAdvisor`] - Combined placement recommendations
//!
//! All outputs are immutable value types; "updates" return new values, so the
//! library is safe to drive from any threading model.

pub mod deadzone;
pub mod error;
pub mod heatmap;
pub mod ie;
pub mod placement;
pub mod planner;
pub mod rf_link;
pub mod rf_tables;
pub mod survey;
pub mod types;
pub mod wire;

pub use error::{NetkitError, NetkitResult};
pub use types::{
    Bssid, ChannelWidth, McsLevel, SignalQuality, SpatialStreams, WifiBand, WifiStandard,
};
