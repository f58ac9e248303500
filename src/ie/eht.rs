//! # EHT Capabilities element (WiFi 7)
//!
//! Decodes the 802.11be EHT Capabilities element (extension id 106):
//! 320 MHz and multi-RU support, preamble puncturing, multi-link operation
//! and 4096-QAM from the PHY capability bytes, plus the EHT-MCS/NSS set
//! (4 bits per stream, 0-13 = highest MCS, 15 = unsupported).

use serde::{Deserialize, Serialize};

use crate::wire::{ByteCursor, bit_at, bits_at};

/// Multi-link operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum MloMode {
    /// Simultaneous transmit/receive on all links
    #[strum(serialize = "STR")]
    Str,
    /// Enhanced multi-link single radio
    #[strum(serialize = "eMLSR")]
    Emlsr,
}

/// Decoded EHT Capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EhtCapabilities {
    /// 320 MHz channels supported (6 GHz only)
    pub supports_320mhz: bool,
    /// Multi-link operation advertised
    pub mlo: bool,
    /// Maximum simultaneous MLO links, 1-16
    pub mlo_max_links: u8,
    /// Advertised MLO modes
    pub mlo_modes: Vec<MloMode>,
    /// Multiple resource units per station
    pub multi_ru: bool,
    /// Preamble-puncturing pattern bitmap (5 bits)
    pub puncturing: u8,
    /// 4096-QAM modulation supported
    pub supports_4096qam: bool,
    /// Highest supported spatial-stream count, 1-16
    pub max_nss: u8,
}

impl Default for EhtCapabilities {
    fn default() -> Self {
        Self {
            supports_320mhz: false,
            mlo: false,
            mlo_max_links: 1,
            mlo_modes: Vec::new(),
            multi_ru: false,
            puncturing: 0,
            supports_4096qam: false,
            max_nss: 4,
        }
    }
}

/// Per-stream nibble marking the stream as unsupported
const EHT_MCS_NONE: u8 = 15;

/// Parse an EHT Capabilities element body (id 255 / ext 106)
///
/// Layout: extension id (1), MAC capabilities (2), PHY capabilities (9),
/// EHT-MCS/NSS set (the ≤80 MHz RX map: 2 bytes, one nibble per stream 1-4).
pub fn parse_eht_capabilities(payload: &[u8]) -> EhtCapabilities {
    let mut cur = ByteCursor::new(payload);
    let mut caps = EhtCapabilities::default();
    cur.skip(1);

    if cur.remaining() < 2 {
        return caps;
    }
    cur.skip(2); // MAC capabilities, not interpreted

    if cur.remaining() < 9 {
        return caps;
    }
    let phy = cur.take(9);
    caps.supports_320mhz = bits_at(phy, 1, 2) != 0;
    caps.multi_ru = bit_at(phy, 7);
    caps.puncturing = phy[1] & 0x1F;
    if phy[2] & 0b01 != 0 {
        caps.mlo_modes.push(MloMode::Str);
    }
    if phy[2] & 0b10 != 0 {
        caps.mlo_modes.push(MloMode::Emlsr);
    }
    caps.mlo = !caps.mlo_modes.is_empty();
    caps.mlo_max_links = ((phy[2] >> 4) & 0x0F) + 1;
    caps.supports_4096qam = phy[3] & 0x01 != 0;

    let mcs_map = cur.take(2);
    caps.max_nss = match highest_supported_nss(mcs_map) {
        // Multi-band heuristic: a 320 MHz radio with 2+ streams per band is
        // assumed to double its aggregate stream count, capped at 16.
        Some(nss) if caps.supports_320mhz && nss >= 2 => (nss * 2).min(16),
        Some(nss) => nss,
        None => 4,
    };
    caps
}

/// Highest stream (4 down to 1) whose nibble is not "unsupported"
fn highest_supported_nss(map: &[u8]) -> Option<u8> {
    (1..=4u8).rev().find(|stream| {
        let index = usize::from(stream - 1);
        map.get(index / 2).is_some_and(|byte| {
            let nibble = if index % 2 == 0 { byte & 0x0F } else { byte >> 4 };
            nibble != EHT_MCS_NONE
        })
    })
}
