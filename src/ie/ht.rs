//! # HT Capabilities element (WiFi 4)
//!
//! Decodes the 802.11n HT Capabilities element (id 45): channel-width and
//! guard-interval bits from the capability word, and the per-stream MCS
//! bitmap from the Supported MCS Set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wire::{ByteCursor, bit16};

/// Decoded HT Capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtCapabilities {
    /// 40 MHz channels supported
    pub supports_40mhz: bool,
    /// Short guard interval at 20 MHz
    pub short_gi_20mhz: bool,
    /// Short guard interval at 40 MHz
    pub short_gi_40mhz: bool,
    /// Greenfield (HT-only preamble) supported
    pub greenfield: bool,
    /// Highest supported spatial-stream count, 1-4
    pub max_nss: u8,
    /// Supported MCS indices (0-7) per spatial stream (1-4)
    pub supported_mcs: BTreeMap<u8, Vec<u8>>,
}

const CAP_40MHZ: u8 = 1;
const CAP_GREENFIELD: u8 = 4;
const CAP_SGI_20: u8 = 5;
const CAP_SGI_40: u8 = 6;

/// Parse an HT Capabilities element body (id 45)
///
/// Layout: capability word (2), A-MPDU parameters (1), Supported MCS Set
/// (16, of which the first 4 bytes carry the stream 1-4 bitmaps).
pub fn parse_ht_capabilities(payload: &[u8]) -> HtCapabilities {
    let mut cur = ByteCursor::new(payload);
    let mut caps = HtCapabilities {
        max_nss: 1,
        ..HtCapabilities::default()
    };

    // Fields are positional: without the capability word nothing after it
    // may be interpreted.
    if cur.remaining() < 2 {
        return caps;
    }
    let word = cur.read_u16();
    caps.supports_40mhz = bit16(word, CAP_40MHZ);
    caps.greenfield = bit16(word, CAP_GREENFIELD);
    caps.short_gi_20mhz = bit16(word, CAP_SGI_20);
    caps.short_gi_40mhz = bit16(word, CAP_SGI_40);

    cur.skip(1); // A-MPDU parameters
    let mcs_bitmap = cur.take(16);
    for stream in 1..=4u8 {
        let Some(&byte) = mcs_bitmap.get(usize::from(stream) - 1) else {
            break;
        };
        if byte == 0 {
            continue;
        }
        let indices: Vec<u8> = (0..8).filter(|bit| byte & (1 << bit) != 0).collect();
        caps.supported_mcs.insert(stream, indices);
        caps.max_nss = stream;
    }
    caps
}
