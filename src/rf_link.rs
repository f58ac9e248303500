//! # RF link model
//!
//! Derives link-quality figures for one BSS from an RSSI observation and the
//! BSS capabilities.
//!
//! ## Available Operations
//! - [`snr`] - Signal-to-noise ratio against a band's noise floor
//! - [`required_snr`] - SNR needed for an (MCS, standard, width, NSS) tuple
//! - [`link_margin`] - Headroom between measured and required SNR
//! - [`max_achievable_mcs`] - Highest MCS with at least the requested margin
//! - [`phy_rate_mbps`] - PHY rate for a configuration
//! - [`effective_throughput_mbps`] - PHY rate scaled by MAC efficiency
//! - [`estimate_distance_m`] - Log-distance range estimate from RSSI
//! - [`analyze_bss`] - Assemble one [`RfMetrics`] record
//!
//! Figures a standard cannot produce (an MCS it does not define, a width it
//! forbids, an SNR too low for any MCS) come back as `None`; only
//! out-of-range caller inputs are errors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NetkitError, NetkitResult};
use crate::rf_tables::{
    self, NoiseModel, base_rate_20mhz, nss_snr_penalty, required_snr_base, width_multiplier,
    width_snr_penalty,
};
use crate::types::{
    Bssid, ChannelWidth, McsLevel, SignalQuality, SpatialStreams, WifiBand, WifiStandard,
    channel_center_mhz,
};

/// Default link margin demanded when searching for the best MCS (dB)
pub const DEFAULT_MIN_MARGIN_DB: f64 = 3.0;

/// Transmit EIRP assumed when none is known (dBm)
pub const DEFAULT_TX_EIRP_DBM: f64 = 20.0;

/// Lowest RSSI the model accepts (dBm)
pub const RSSI_MIN_DBM: i32 = -120;
/// Highest RSSI the model accepts (dBm)
pub const RSSI_MAX_DBM: i32 = 0;

fn validate_rssi(rssi_dbm: i32) -> NetkitResult<()> {
    if !(RSSI_MIN_DBM..=RSSI_MAX_DBM).contains(&rssi_dbm) {
        return Err(NetkitError::RssiOutOfRange(rssi_dbm));
    }
    Ok(())
}

/// Signal-to-noise ratio of an RSSI observation (dB)
pub fn snr(rssi_dbm: i32, band: WifiBand, noise: &NoiseModel) -> NetkitResult<f64> {
    validate_rssi(rssi_dbm)?;
    Ok(f64::from(rssi_dbm) - noise.floor_dbm(band))
}

/// SNR needed to sustain an MCS under the given configuration (dB)
///
/// Base requirement plus the channel-width and spatial-stream penalties.
/// `None` when the standard does not define the MCS or forbids the width.
pub fn required_snr(
    mcs: McsLevel,
    standard: WifiStandard,
    width: ChannelWidth,
    nss: SpatialStreams,
) -> Option<f64> {
    width_multiplier(standard, width)?;
    let base = required_snr_base(standard, mcs)?;
    Some(base + width_snr_penalty(width) + nss_snr_penalty(nss))
}

/// Headroom between a measured SNR and the requirement for an MCS (dB)
pub fn link_margin(
    snr_db: f64,
    mcs: McsLevel,
    standard: WifiStandard,
    width: ChannelWidth,
    nss: SpatialStreams,
) -> Option<f64> {
    Some(snr_db - required_snr(mcs, standard, width, nss)?)
}

/// Highest MCS whose link margin is at least `min_margin_db`
///
/// `None` when even MCS 0 cannot be sustained. Monotone in `snr_db`.
pub fn max_achievable_mcs(
    snr_db: f64,
    standard: WifiStandard,
    width: ChannelWidth,
    nss: SpatialStreams,
    min_margin_db: f64,
) -> Option<McsLevel> {
    (0..=standard.max_mcs())
        .rev()
        .filter_map(|index| McsLevel::new(index).ok())
        .find(|&mcs| {
            link_margin(snr_db, mcs, standard, width, nss)
                .is_some_and(|margin| margin >= min_margin_db)
        })
}

/// PHY rate for a configuration (Mbps)
///
/// Base 20 MHz per-stream rate scaled by channel width and stream count.
/// `None` when the standard does not define the MCS or forbids the width.
pub fn phy_rate_mbps(
    mcs: McsLevel,
    standard: WifiStandard,
    width: ChannelWidth,
    nss: SpatialStreams,
) -> Option<f64> {
    let base = base_rate_20mhz(standard, mcs)?;
    let multiplier = width_multiplier(standard, width)?;
    Some(base * multiplier * f64::from(nss.count()))
}

/// Expected application-visible throughput for a PHY rate (Mbps)
pub fn effective_throughput_mbps(phy_rate_mbps: f64, standard: WifiStandard) -> f64 {
    phy_rate_mbps * rf_tables::efficiency(standard)
}

/// Range estimate from an RSSI observation via inverse log-distance path
/// loss (meters)
///
/// Assumes the transmitter radiated `tx_eirp_dbm`. Estimates below one meter
/// report one meter, matching the model's reference distance.
pub fn estimate_distance_m(
    rssi_dbm: i32,
    freq_mhz: u32,
    band: WifiBand,
    tx_eirp_dbm: f64,
) -> NetkitResult<f64> {
    validate_rssi(rssi_dbm)?;
    let path_loss = tx_eirp_dbm - f64::from(rssi_dbm);
    let exponent =
        (path_loss - rf_tables::path_loss_1m_db(freq_mhz)) / (10.0 * rf_tables::path_loss_exponent(band));
    Ok(10f64.powf(exponent).max(1.0))
}

/// Link-quality summary for one observed BSS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfMetrics {
    /// The observed BSS
    pub bssid: Bssid,
    /// Band the BSS operates on
    pub band: WifiBand,
    /// Channel number
    pub channel: u16,
    /// Channel center frequency (MHz)
    pub freq_mhz: u32,
    /// Observed RSSI (dBm)
    pub rssi_dbm: i32,
    /// Assumed noise floor (dBm)
    pub noise_dbm: f64,
    /// Derived signal-to-noise ratio (dB)
    pub snr_db: f64,
    /// Margin over the requirement of the best MCS, when one qualifies (dB)
    pub link_margin_db: Option<f64>,
    /// Log-distance range estimate (m)
    pub distance_m: Option<f64>,
    /// Best sustainable MCS, when any qualifies
    pub est_max_mcs: Option<McsLevel>,
    /// PHY rate at the best MCS (Mbps)
    pub est_max_phy_mbps: Option<f64>,
    /// Effective throughput at the best MCS (Mbps)
    pub est_throughput_mbps: Option<f64>,
    /// Quality bucket for the derived SNR
    pub quality: SignalQuality,
}

/// Assemble the full metrics record for one BSS observation
pub fn analyze_bss(
    bssid: Bssid,
    band: WifiBand,
    channel: u16,
    rssi_dbm: i32,
    standard: WifiStandard,
    width: ChannelWidth,
    nss: SpatialStreams,
    noise: &NoiseModel,
) -> NetkitResult<RfMetrics> {
    let freq_mhz =
        channel_center_mhz(band, channel).ok_or(NetkitError::InvalidChannel { band, channel })?;
    let snr_db = snr(rssi_dbm, band, noise)?;

    let est_max_mcs = max_achievable_mcs(snr_db, standard, width, nss, DEFAULT_MIN_MARGIN_DB);
    let link_margin_db =
        est_max_mcs.and_then(|mcs| link_margin(snr_db, mcs, standard, width, nss));
    let est_max_phy_mbps = est_max_mcs.and_then(|mcs| phy_rate_mbps(mcs, standard, width, nss));
    let est_throughput_mbps =
        est_max_phy_mbps.map(|phy| effective_throughput_mbps(phy, standard));
    let distance_m = estimate_distance_m(rssi_dbm, freq_mhz, band, DEFAULT_TX_EIRP_DBM).ok();

    debug!(
        %bssid,
        snr_db,
        ?est_max_mcs,
        "analyzed bss"
    );
    Ok(RfMetrics {
        bssid,
        band,
        channel,
        freq_mhz,
        rssi_dbm,
        noise_dbm: noise.floor_dbm(band),
        snr_db,
        link_margin_db,
        distance_m,
        est_max_mcs,
        est_max_phy_mbps,
        est_throughput_mbps,
        quality: rf_tables::snr_quality(snr_db),
    })
}
