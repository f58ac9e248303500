//! # Shared value types
//!
//! Closed enumerations and small newtypes used by every subsystem: bands,
//! channel widths, Wi-Fi standards, BSSIDs, MCS indices and signal-quality
//! labels, plus channel/frequency conversion for all three bands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NetkitError, NetkitResult};

/// Radio band of a BSS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum WifiBand {
    /// 2.4 GHz (channels 1-14)
    #[strum(serialize = "2.4 GHz")]
    Band2_4GHz,
    /// 5 GHz (channels 36-177)
    #[strum(serialize = "5 GHz")]
    Band5GHz,
    /// 6 GHz (channels 1-233, 802.11ax/be)
    #[strum(serialize = "6 GHz")]
    Band6GHz,
}

impl WifiBand {
    /// Derive the band from a center frequency in MHz
    pub fn from_frequency(freq_mhz: u32) -> Option<WifiBand> {
        match freq_mhz {
            2401..=2495 => Some(WifiBand::Band2_4GHz),
            5150..=5895 => Some(WifiBand::Band5GHz),
            5945..=7125 => Some(WifiBand::Band6GHz),
            _ => None,
        }
    }
}

/// Channel width used for rate and SNR computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelWidth {
    Mhz20 = 20,
    Mhz40 = 40,
    Mhz80 = 80,
    Mhz160 = 160,
    Mhz320 = 320,
}

impl ChannelWidth {
    /// Width in MHz
    pub fn mhz(&self) -> u16 {
        *self as u16
    }

    /// Rate multiplier relative to a 20 MHz channel
    pub fn multiplier(&self) -> f64 {
        f64::from(self.mhz()) / 20.0
    }
}

impl fmt::Display for ChannelWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.mhz())
    }
}

/// Wi-Fi standard / generation
///
/// Doubles as the derived generation on a parsed capability record, so it is
/// ordered: a higher variant always means a newer generation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum WifiStandard {
    /// 802.11a/b/g, no HT support
    #[default]
    #[strum(serialize = "Legacy")]
    Legacy,
    /// 802.11n (HT)
    #[strum(serialize = "Wi-Fi 4")]
    Wifi4,
    /// 802.11ac (VHT)
    #[strum(serialize = "Wi-Fi 5")]
    Wifi5,
    /// 802.11ax (HE)
    #[strum(serialize = "Wi-Fi 6")]
    Wifi6,
    /// 802.11ax on the 6 GHz band
    #[strum(serialize = "Wi-Fi 6E")]
    Wifi6E,
    /// 802.11be (EHT)
    #[strum(serialize = "Wi-Fi 7")]
    Wifi7,
}

impl WifiStandard {
    /// Highest MCS index defined for the standard
    pub fn max_mcs(&self) -> u8 {
        match self {
            WifiStandard::Legacy => 0,
            WifiStandard::Wifi4 => 7,
            WifiStandard::Wifi5 => 9,
            WifiStandard::Wifi6 | WifiStandard::Wifi6E => 11,
            WifiStandard::Wifi7 => 13,
        }
    }
}

/// BSSID (AP MAC address)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bssid([u8; 6]);

impl Bssid {
    /// Create a BSSID from raw bytes
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the BSSID
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for Bssid {
    type Err = NetkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || NetkitError::MalformedBssid(s.to_string());
        let mut bytes = [0u8; 6];
        let mut count = 0;
        for part in s.split(':') {
            if count == 6 {
                return Err(malformed());
            }
            bytes[count] = u8::from_str_radix(part, 16).map_err(|_| malformed())?;
            count += 1;
        }
        if count != 6 {
            return Err(malformed());
        }
        Ok(Bssid(bytes))
    }
}

/// Validated MCS index in [0, 13]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct McsLevel(u8);

impl McsLevel {
    /// Highest MCS index any supported standard defines
    pub const MAX: u8 = 13;

    /// Create a validated MCS level
    pub fn new(index: u8) -> NetkitResult<Self> {
        if index > Self::MAX {
            return Err(NetkitError::McsOutOfRange(index));
        }
        Ok(Self(index))
    }

    /// The raw index
    pub const fn index(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for McsLevel {
    type Error = NetkitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for McsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MCS{}", self.0)
    }
}

/// Validated spatial-stream count in [1, 16]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpatialStreams(u8);

impl SpatialStreams {
    /// Most streams any supported standard defines
    pub const MAX: u8 = 16;

    /// Create a validated stream count
    pub fn new(count: u8) -> NetkitResult<Self> {
        if count < 1 || count > Self::MAX {
            return Err(NetkitError::NssOutOfRange(count));
        }
        Ok(Self(count))
    }

    /// The raw count
    pub const fn count(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SpatialStreams {
    type Error = NetkitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for SpatialStreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}SS", self.0)
    }
}

/// Human-readable signal quality bucket
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum SignalQuality {
    #[strum(serialize = "Very Weak")]
    VeryWeak,
    Weak,
    Fair,
    Good,
    #[strum(serialize = "Very Good")]
    VeryGood,
    Excellent,
}

impl SignalQuality {
    /// Bucket an RSSI measurement (dBm)
    pub fn from_rssi(rssi_dbm: i32) -> SignalQuality {
        match rssi_dbm {
            -30..=0 => SignalQuality::Excellent,
            -50..=-31 => SignalQuality::VeryGood,
            -60..=-51 => SignalQuality::Good,
            -70..=-61 => SignalQuality::Fair,
            -80..=-71 => SignalQuality::Weak,
            _ => SignalQuality::VeryWeak,
        }
    }
}

/// Center frequency in MHz for a (band, channel) pair
///
/// Returns `None` for channel numbers the band does not define. Channel 14
/// (Japan, 2.4 GHz) sits off the 5 MHz raster and is special-cased.
pub fn channel_center_mhz(band: WifiBand, channel: u16) -> Option<u32> {
    match band {
        WifiBand::Band2_4GHz => match channel {
            1..=13 => Some(2407 + 5 * u32::from(channel)),
            14 => Some(2484),
            _ => None,
        },
        WifiBand::Band5GHz => match channel {
            36..=177 => Some(5000 + 5 * u32::from(channel)),
            _ => None,
        },
        WifiBand::Band6GHz => match channel {
            1..=233 => Some(5950 + 5 * u32::from(channel)),
            _ => None,
        },
    }
}

/// Band and channel number for a center frequency in MHz
pub fn channel_from_mhz(freq_mhz: u32) -> Option<(WifiBand, u16)> {
    match freq_mhz {
        2484 => Some((WifiBand::Band2_4GHz, 14)),
        2412..=2472 => Some((WifiBand::Band2_4GHz, ((freq_mhz - 2407) / 5) as u16)),
        5180..=5885 => Some((WifiBand::Band5GHz, ((freq_mhz - 5000) / 5) as u16)),
        5955..=7115 => Some((WifiBand::Band6GHz, ((freq_mhz - 5950) / 5) as u16)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bssid_display_and_parse() {
        let bssid = Bssid::new([0xAA, 0xBB, 0x0C, 0x1D, 0x2E, 0x3F]);
        assert_eq!(bssid.to_string(), "AA:BB:0C:1D:2E:3F");
        assert_eq!("aa:bb:0c:1d:2e:3f".parse::<Bssid>().unwrap(), bssid);
        assert!("aa:bb:0c".parse::<Bssid>().is_err());
        assert!("aa:bb:0c:1d:2e:3f:11".parse::<Bssid>().is_err());
    }

    #[test]
    fn mcs_level_bounds() {
        assert!(McsLevel::new(0).is_ok());
        assert!(McsLevel::new(13).is_ok());
        assert_eq!(McsLevel::new(14), Err(NetkitError::McsOutOfRange(14)));
    }

    #[test]
    fn channel_frequency_round_trip() {
        assert_eq!(channel_center_mhz(WifiBand::Band2_4GHz, 6), Some(2437));
        assert_eq!(channel_center_mhz(WifiBand::Band2_4GHz, 14), Some(2484));
        assert_eq!(channel_center_mhz(WifiBand::Band5GHz, 36), Some(5180));
        assert_eq!(channel_center_mhz(WifiBand::Band6GHz, 37), Some(6135));
        assert_eq!(channel_from_mhz(2437), Some((WifiBand::Band2_4GHz, 6)));
        assert_eq!(channel_from_mhz(5180), Some((WifiBand::Band5GHz, 36)));
        assert_eq!(channel_from_mhz(6135), Some((WifiBand::Band6GHz, 37)));
        assert_eq!(channel_from_mhz(1000), None);
    }

    #[test]
    fn generation_ordering() {
        assert!(WifiStandard::Wifi7 > WifiStandard::Wifi6E);
        assert!(WifiStandard::Wifi4 > WifiStandard::Legacy);
    }

    #[test]
    fn quality_buckets() {
        assert_eq!(SignalQuality::from_rssi(-20), SignalQuality::Excellent);
        assert_eq!(SignalQuality::from_rssi(-55), SignalQuality::Good);
        assert_eq!(SignalQuality::from_rssi(-95), SignalQuality::VeryWeak);
    }
}
