//! # Static RF tables
//!
//! The numerology behind the link model: per-standard MCS base rates at
//! 20 MHz with 800 ns guard interval, per-MCS required SNR (with roughly
//! 3 dB of packet-error margin built in), channel-width and spatial-stream
//! adjustments, per-band noise floors and quality thresholds.
//!
//! Everything here is a total, in-process lookup; no I/O and no failure
//! paths. Combinations a standard does not define (WiFi 4 above 40 MHz,
//! MCS 12 below WiFi 7) yield `None` from the lookups that model validity.

use serde::{Deserialize, Serialize};

use crate::types::{ChannelWidth, McsLevel, SignalQuality, SpatialStreams, WifiBand, WifiStandard};

/// Per-stream PHY rate at 20 MHz / 800 ns GI, indexed by MCS (Mbps)
const WIFI4_BASE_RATES: [f64; 8] = [6.5, 13.0, 19.5, 26.0, 39.0, 52.0, 58.5, 65.0];
const WIFI5_BASE_RATES: [f64; 10] = [6.5, 13.0, 19.5, 26.0, 39.0, 52.0, 58.5, 65.0, 78.0, 86.7];
const WIFI6_BASE_RATES: [f64; 12] = [
    8.6, 17.2, 25.8, 34.4, 51.5, 68.8, 77.4, 86.0, 103.2, 114.7, 129.0, 143.4,
];
const WIFI7_BASE_RATES: [f64; 14] = [
    8.6, 17.2, 25.8, 34.4, 51.5, 68.8, 77.4, 86.0, 103.2, 114.7, 129.0, 143.4, 154.9, 172.1,
];

/// Required SNR in dB to sustain each MCS at 20 MHz with one stream
const WIFI4_REQUIRED_SNR: [f64; 8] = [2.0, 5.0, 7.0, 9.0, 12.0, 16.0, 18.0, 20.0];
const WIFI5_REQUIRED_SNR: [f64; 10] = [2.0, 5.0, 7.0, 9.0, 12.0, 16.0, 18.0, 20.0, 24.0, 26.0];
const WIFI6_REQUIRED_SNR: [f64; 12] = [
    2.0, 5.0, 7.0, 9.0, 11.0, 14.0, 16.0, 19.0, 22.0, 26.0, 29.5, 33.0,
];
const WIFI7_REQUIRED_SNR: [f64; 14] = [
    2.0, 5.0, 7.0, 9.0, 11.0, 14.0, 16.0, 19.0, 22.0, 26.0, 29.5, 33.0, 36.0, 39.0,
];

/// Fallback noise floor for code paths without band information (dBm)
pub const DEFAULT_NOISE_FLOOR_DBM: f64 = -95.0;

/// Base PHY rate for one spatial stream at 20 MHz (Mbps)
///
/// `None` when the standard does not define the MCS index (or defines no
/// MCS at all, as for legacy rates).
pub fn base_rate_20mhz(standard: WifiStandard, mcs: McsLevel) -> Option<f64> {
    let table: &[f64] = match standard {
        WifiStandard::Legacy => return None,
        WifiStandard::Wifi4 => &WIFI4_BASE_RATES,
        WifiStandard::Wifi5 => &WIFI5_BASE_RATES,
        WifiStandard::Wifi6 | WifiStandard::Wifi6E => &WIFI6_BASE_RATES,
        WifiStandard::Wifi7 => &WIFI7_BASE_RATES,
    };
    table.get(usize::from(mcs.index())).copied()
}

/// Rate multiplier for a channel width, `None` when the standard forbids it
///
/// WiFi 4 tops out at 40 MHz; only WiFi 7 reaches 320 MHz.
pub fn width_multiplier(standard: WifiStandard, width: ChannelWidth) -> Option<f64> {
    let allowed = match standard {
        WifiStandard::Legacy => width == ChannelWidth::Mhz20,
        WifiStandard::Wifi4 => width.mhz() <= 40,
        WifiStandard::Wifi5 | WifiStandard::Wifi6 | WifiStandard::Wifi6E => width.mhz() <= 160,
        WifiStandard::Wifi7 => true,
    };
    allowed.then(|| width.multiplier())
}

/// Required SNR for an MCS at 20 MHz with one stream
///
/// `None` when the standard does not define the MCS index.
pub fn required_snr_base(standard: WifiStandard, mcs: McsLevel) -> Option<f64> {
    let table: &[f64] = match standard {
        WifiStandard::Legacy => return None,
        WifiStandard::Wifi4 => &WIFI4_REQUIRED_SNR,
        WifiStandard::Wifi5 => &WIFI5_REQUIRED_SNR,
        WifiStandard::Wifi6 | WifiStandard::Wifi6E => &WIFI6_REQUIRED_SNR,
        WifiStandard::Wifi7 => &WIFI7_REQUIRED_SNR,
    };
    table.get(usize::from(mcs.index())).copied()
}

/// Additional SNR needed for channels wider than 20 MHz (dB)
pub fn width_snr_penalty(width: ChannelWidth) -> f64 {
    match width {
        ChannelWidth::Mhz20 => 0.0,
        ChannelWidth::Mhz40 => 3.0,
        ChannelWidth::Mhz80 => 6.0,
        ChannelWidth::Mhz160 => 9.0,
        ChannelWidth::Mhz320 => 12.0,
    }
}

/// Additional SNR needed to keep multiple spatial streams separable (dB)
pub fn nss_snr_penalty(nss: SpatialStreams) -> f64 {
    match nss.count() {
        1 => 0.0,
        2 => 1.5,
        3..=4 => 3.0,
        5..=8 => 4.5,
        _ => 6.0,
    }
}

/// MAC-layer efficiency factor applied to the PHY rate
pub fn efficiency(standard: WifiStandard) -> f64 {
    match standard {
        WifiStandard::Legacy => 0.4,
        WifiStandard::Wifi4 => 0.5,
        WifiStandard::Wifi5 => 0.6,
        WifiStandard::Wifi6 | WifiStandard::Wifi6E => 0.7,
        WifiStandard::Wifi7 => 0.75,
    }
}

/// Per-band noise floor assumptions
///
/// The default figures reflect a quiet indoor environment; the conservative
/// variant raises the floor by 3 dB (more ambient noise), the optimistic
/// variant lowers it by 3 dB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Noise floor on 2.4 GHz (dBm)
    pub floor_2_4ghz_dbm: f64,
    /// Noise floor on 5 GHz (dBm)
    pub floor_5ghz_dbm: f64,
    /// Noise floor on 6 GHz (dBm)
    pub floor_6ghz_dbm: f64,
}

impl NoiseModel {
    /// Typical indoor noise floors: -92 / -95 / -96 dBm
    pub fn typical() -> NoiseModel {
        NoiseModel {
            floor_2_4ghz_dbm: -92.0,
            floor_5ghz_dbm: -95.0,
            floor_6ghz_dbm: -96.0,
        }
    }

    /// Noisy environment: floors 3 dB above typical
    pub fn conservative() -> NoiseModel {
        NoiseModel::typical().shifted(3.0)
    }

    /// Clean environment: floors 3 dB below typical
    pub fn optimistic() -> NoiseModel {
        NoiseModel::typical().shifted(-3.0)
    }

    fn shifted(self, delta_db: f64) -> NoiseModel {
        NoiseModel {
            floor_2_4ghz_dbm: self.floor_2_4ghz_dbm + delta_db,
            floor_5ghz_dbm: self.floor_5ghz_dbm + delta_db,
            floor_6ghz_dbm: self.floor_6ghz_dbm + delta_db,
        }
    }

    /// Noise floor for a band (dBm)
    pub fn floor_dbm(&self, band: WifiBand) -> f64 {
        match band {
            WifiBand::Band2_4GHz => self.floor_2_4ghz_dbm,
            WifiBand::Band5GHz => self.floor_5ghz_dbm,
            WifiBand::Band6GHz => self.floor_6ghz_dbm,
        }
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel::typical()
    }
}

/// Quality bucket for an SNR figure (dB)
pub fn snr_quality(snr_db: f64) -> SignalQuality {
    if snr_db >= 40.0 {
        SignalQuality::Excellent
    } else if snr_db >= 30.0 {
        SignalQuality::VeryGood
    } else if snr_db >= 25.0 {
        SignalQuality::Good
    } else if snr_db >= 15.0 {
        SignalQuality::Fair
    } else if snr_db >= 10.0 {
        SignalQuality::Weak
    } else {
        SignalQuality::VeryWeak
    }
}

/// Free-space path loss at one meter for a carrier frequency (dB)
pub fn path_loss_1m_db(freq_mhz: u32) -> f64 {
    20.0 * f64::from(freq_mhz).log10() - 27.55
}

/// Log-distance path-loss exponent per band
///
/// Higher bands penetrate obstacles worse, so the indoor exponent grows
/// with frequency.
pub fn path_loss_exponent(band: WifiBand) -> f64 {
    match band {
        WifiBand::Band2_4GHz => 2.8,
        WifiBand::Band5GHz => 3.2,
        WifiBand::Band6GHz => 3.5,
    }
}

/// Log-distance path loss over `distance_m` meters (dB)
///
/// Distances below one meter are treated as one meter.
pub fn path_loss_db(freq_mhz: u32, band: WifiBand, distance_m: f64) -> f64 {
    path_loss_1m_db(freq_mhz) + 10.0 * path_loss_exponent(band) * distance_m.max(1.0).log10()
}
