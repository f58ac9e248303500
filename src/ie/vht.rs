//! # VHT Capabilities element (WiFi 5)
//!
//! Decodes the 802.11ac VHT Capabilities element (id 191): wide-channel and
//! guard-interval support from the capability word plus the per-stream
//! VHT-MCS map. 80 MHz operation is implied by VHT itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wire::{ByteCursor, bit32, bits32};

/// Decoded VHT Capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhtCapabilities {
    /// Always true: VHT requires 80 MHz support
    pub supports_80mhz: bool,
    /// 160 MHz channels supported
    pub supports_160mhz: bool,
    /// Non-contiguous 80+80 MHz supported
    pub supports_80p80mhz: bool,
    /// Highest supported spatial-stream count, 1-8
    pub max_nss: u8,
    /// Downlink MU-MIMO capable
    pub mu_mimo: bool,
    /// Any beamforming role advertised
    pub beamforming: bool,
    /// Short guard interval at 80 MHz
    pub short_gi_80mhz: bool,
    /// Short guard interval at 160 MHz
    pub short_gi_160mhz: bool,
    /// Highest supported MCS index (7, 8 or 9) per spatial stream
    pub supported_mcs: BTreeMap<u8, u8>,
}

impl Default for VhtCapabilities {
    fn default() -> Self {
        Self {
            supports_80mhz: true,
            supports_160mhz: false,
            supports_80p80mhz: false,
            max_nss: 1,
            mu_mimo: false,
            beamforming: false,
            short_gi_80mhz: false,
            short_gi_160mhz: false,
            supported_mcs: BTreeMap::new(),
        }
    }
}

const WIDTH_SHIFT: u8 = 2;
const BIT_SGI_80: u8 = 5;
const BIT_SGI_160: u8 = 6;
const BEAMFORMING_SHIFT: u8 = 11;
const BIT_MU_MIMO: u8 = 19;

/// Per-stream field value marking the stream as unsupported
const VHT_MCS_NONE: u16 = 3;

/// Parse a VHT Capabilities element body (id 191)
///
/// Layout: capability word (4), VHT-MCS/NSS set (8, of which the low 16 bits
/// are the RX map: one 2-bit field per stream, 0 = MCS 0-7, 1 = MCS 0-8,
/// 2 = MCS 0-9, 3 = unsupported).
pub fn parse_vht_capabilities(payload: &[u8]) -> VhtCapabilities {
    let mut cur = ByteCursor::new(payload);
    let mut caps = VhtCapabilities::default();

    // Fields are positional: once one is missing, nothing after it may be
    // interpreted.
    if cur.remaining() < 4 {
        return caps;
    }
    let word = cur.read_u32();
    match bits32(word, WIDTH_SHIFT, 0b11) {
        1 => caps.supports_160mhz = true,
        2 => {
            caps.supports_160mhz = true;
            caps.supports_80p80mhz = true;
        }
        _ => {}
    }
    caps.short_gi_80mhz = bit32(word, BIT_SGI_80);
    caps.short_gi_160mhz = bit32(word, BIT_SGI_160);
    caps.beamforming = bits32(word, BEAMFORMING_SHIFT, 0b11) != 0;
    caps.mu_mimo = bit32(word, BIT_MU_MIMO);

    if cur.remaining() >= 2 {
        let rx_map = cur.read_u16();
        for stream in 1..=8u8 {
            let field = (rx_map >> ((stream - 1) * 2)) & 0b11;
            if field == VHT_MCS_NONE {
                continue;
            }
            caps.supported_mcs.insert(stream, 7 + field as u8);
            caps.max_nss = caps.max_nss.max(stream);
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(cap_word: u32, rx_map: u16) -> Vec<u8> {
        let mut body = vec![0u8; 12];
        body[..4].copy_from_slice(&cap_word.to_le_bytes());
        body[4..6].copy_from_slice(&rx_map.to_le_bytes());
        // TX map mirrors RX; left zeroed, it is not interpreted
        body
    }

    #[test]
    fn mu_mimo_single_stream() {
        // Capability bytes 00 00 08 00: only bit 19 (MU-MIMO) set.
        // RX map FE FF: stream 1 = MCS 0-9, streams 2-8 unsupported.
        let caps = parse_vht_capabilities(&[
            0x00, 0x00, 0x08, 0x00, 0xFE, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);
        assert!(caps.mu_mimo);
        assert_eq!(caps.max_nss, 1);
        assert_eq!(caps.supported_mcs.get(&1), Some(&9));
        assert!(caps.supports_80mhz);
        assert!(!caps.supports_160mhz);
        assert!(!caps.supports_80p80mhz);
    }

    #[test]
    fn width_set_variants() {
        assert!(parse_vht_capabilities(&payload(0b01 << 2, 0xFFFF)).supports_160mhz);
        let both = parse_vht_capabilities(&payload(0b10 << 2, 0xFFFF));
        assert!(both.supports_160mhz && both.supports_80p80mhz);
        let none = parse_vht_capabilities(&payload(0, 0xFFFF));
        assert!(!none.supports_160mhz && !none.supports_80p80mhz);
    }

    #[test]
    fn guard_intervals_and_beamforming() {
        let caps = parse_vht_capabilities(&payload((1 << 5) | (1 << 6) | (1 << 11), 0xFFFF));
        assert!(caps.short_gi_80mhz);
        assert!(caps.short_gi_160mhz);
        assert!(caps.beamforming);
        let caps = parse_vht_capabilities(&payload(1 << 12, 0xFFFF));
        assert!(caps.beamforming);
    }

    #[test]
    fn four_stream_mcs_map() {
        // Streams 1-4 = MCS 0-9 (0b10), streams 5-8 unsupported
        let rx_map = 0b11_11_11_11_10_10_10_10;
        let caps = parse_vht_capabilities(&payload(0, rx_map));
        assert_eq!(caps.max_nss, 4);
        assert_eq!(caps.supported_mcs.len(), 4);
        assert_eq!(caps.supported_mcs.get(&4), Some(&9));
    }

    #[test]
    fn all_unsupported_defaults_to_one_stream() {
        let caps = parse_vht_capabilities(&payload(0, 0xFFFF));
        assert_eq!(caps.max_nss, 1);
        assert!(caps.supported_mcs.is_empty());
    }

    #[test]
    fn short_payload_defaults() {
        let caps = parse_vht_capabilities(&[0x00, 0x00]);
        assert_eq!(caps, VhtCapabilities::default());
    }
}
