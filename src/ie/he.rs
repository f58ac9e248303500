//! # HE Capabilities and HE Operation elements (WiFi 6)
//!
//! Decodes the 802.11ax HE Capabilities (extension id 35) and HE Operation
//! (extension id 36) elements. Both payloads start with the 1-byte element
//! extension id, which is skipped here.
//!
//! The HE-MCS/NSS set carries one RX/TX map pair per advertised width: the
//! ≤80 MHz pair is always present, the 160 MHz and 80+80 MHz pairs only when
//! the PHY capabilities advertise those widths. Each map packs a 2-bit field
//! per spatial stream: 0 = MCS 0-7, 1 = MCS 0-9, 2 = MCS 0-11,
//! 3 = unsupported.

use serde::{Deserialize, Serialize};

use crate::wire::{ByteCursor, bit_at};

/// Decoded HE Capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeCapabilities {
    /// Always true: OFDMA is mandatory in HE
    pub ofdma: bool,
    /// Target Wake Time requester role
    pub twt_requester: bool,
    /// Target Wake Time responder role
    pub twt_responder: bool,
    /// Downlink MU-MIMO capable
    pub mu_mimo_dl: bool,
    /// Uplink MU-MIMO capable
    pub mu_mimo_ul: bool,
    /// 40 MHz channels on the 2.4 GHz band
    pub width_40mhz_2_4ghz: bool,
    /// 80 MHz channels on the 5 GHz band
    pub width_80mhz_5ghz: bool,
    /// 160 MHz channels
    pub width_160mhz: bool,
    /// Non-contiguous 80+80 MHz
    pub width_80p80mhz: bool,
    /// Beamformee role advertised
    pub beamformee: bool,
    /// Beamformer role advertised
    pub beamformer: bool,
    /// Highest supported spatial-stream count, 1-8
    pub max_nss: u8,
    /// Operates on both 2.4 GHz and a high band
    pub dual_band: bool,
}

impl Default for HeCapabilities {
    fn default() -> Self {
        Self {
            ofdma: true,
            twt_requester: false,
            twt_responder: false,
            mu_mimo_dl: false,
            mu_mimo_ul: false,
            width_40mhz_2_4ghz: false,
            width_80mhz_5ghz: false,
            width_160mhz: false,
            width_80p80mhz: false,
            beamformee: false,
            beamformer: false,
            max_nss: 1,
            dual_band: false,
        }
    }
}

/// Per-stream field value marking the stream as unsupported
const HE_MCS_NONE: u16 = 3;

// MAC capability bit positions
const MAC_TWT_REQUESTER: usize = 1;
const MAC_TWT_RESPONDER: usize = 2;

// PHY capability bit positions (over the 11-byte field)
const PHY_WIDTH_40_2_4: usize = 1;
const PHY_WIDTH_80_5: usize = 2;
const PHY_WIDTH_160: usize = 3;
const PHY_WIDTH_80P80: usize = 4;
const PHY_BEAMFORMEE: usize = 3 * 8 + 5;
const PHY_BEAMFORMER: usize = 3 * 8 + 6;
const PHY_MU_MIMO_UL: usize = 4 * 8;
const PHY_MU_MIMO_DL: usize = 4 * 8 + 1;

/// Parse an HE Capabilities element body (id 255 / ext 35)
///
/// Layout: extension id (1), MAC capabilities (6), PHY capabilities (11),
/// HE-MCS/NSS set (2 bytes per map).
pub fn parse_he_capabilities(payload: &[u8]) -> HeCapabilities {
    let mut cur = ByteCursor::new(payload);
    let mut caps = HeCapabilities::default();
    cur.skip(1);

    if cur.remaining() < 6 {
        return caps;
    }
    let mac = cur.take(6);
    caps.twt_requester = bit_at(mac, MAC_TWT_REQUESTER);
    caps.twt_responder = bit_at(mac, MAC_TWT_RESPONDER);

    if cur.remaining() < 11 {
        return caps;
    }
    let phy = cur.take(11);
    caps.width_40mhz_2_4ghz = bit_at(phy, PHY_WIDTH_40_2_4);
    caps.width_80mhz_5ghz = bit_at(phy, PHY_WIDTH_80_5);
    caps.width_160mhz = bit_at(phy, PHY_WIDTH_160);
    caps.width_80p80mhz = bit_at(phy, PHY_WIDTH_80P80);
    caps.beamformee = bit_at(phy, PHY_BEAMFORMEE);
    caps.beamformer = bit_at(phy, PHY_BEAMFORMER);
    caps.mu_mimo_ul = bit_at(phy, PHY_MU_MIMO_UL);
    caps.mu_mimo_dl = bit_at(phy, PHY_MU_MIMO_DL);
    caps.dual_band = caps.width_40mhz_2_4ghz && (caps.width_80mhz_5ghz || caps.width_160mhz);

    // RX/TX map pairs in width order; each RX map is a candidate for the
    // stream count, highest-priority first.
    let mut rx_maps = Vec::with_capacity(3);
    if cur.remaining() >= 2 {
        rx_maps.push(cur.read_u16());
        cur.skip(2); // TX map
    }
    if caps.width_160mhz && cur.remaining() >= 2 {
        rx_maps.push(cur.read_u16());
        cur.skip(2);
    }
    if caps.width_80p80mhz && cur.remaining() >= 2 {
        rx_maps.push(cur.read_u16());
        cur.skip(2);
    }
    caps.max_nss = rx_maps
        .iter()
        .find_map(|&map| highest_supported_nss(map))
        .unwrap_or(1);
    caps
}

/// Highest stream (8 down to 1) whose 2-bit field is not "unsupported"
fn highest_supported_nss(map: u16) -> Option<u8> {
    (1..=8u8)
        .rev()
        .find(|stream| (map >> ((stream - 1) * 2)) & 0b11 != HE_MCS_NONE)
}

/// Decoded HE Operation element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeOperation {
    /// BSS color, 0-63; 0 means coloring disabled
    pub bss_color: u8,
    /// AP advertises dual-band operation
    pub dual_band_mode: bool,
    /// TWT scheduling active on this BSS
    pub twt_active: bool,
}

const OP_TWT_ACTIVE: usize = 1;
const OP_DUAL_BAND: usize = 8 + 6;

/// Parse an HE Operation element body (id 255 / ext 36)
///
/// Layout: extension id (1), operation parameters (3), BSS color (1).
pub fn parse_he_operation(payload: &[u8]) -> HeOperation {
    let mut cur = ByteCursor::new(payload);
    let mut op = HeOperation::default();
    cur.skip(1);

    if cur.remaining() < 3 {
        return op;
    }
    let params = cur.take(3);
    op.twt_active = bit_at(params, OP_TWT_ACTIVE);
    op.dual_band_mode = bit_at(params, OP_DUAL_BAND);

    if cur.remaining() >= 1 {
        op.bss_color = cur.read_u8() & 0x3F;
    }
    op
}
