//! # Information Element decoding
//!
//! Turns raw management-frame Information Elements into one typed
//! [`ParsedInformationElements`] capability record.
//!
//! ## Available Operations
//! - [`parse_information_elements`] - Decode a set of IEs observed on a BSS
//! - [`parse_information_elements_on_band`] - Same, with the observed band for
//!   WiFi 6E detection
//!
//! ## Decoding policy
//! Decoding never fails: IEs with unknown ids contribute nothing, and
//! payloads shorter than an element's fixed fields yield a defaulted record
//! with only the present fields parsed. When the same element appears twice
//! the later occurrence wins.
//!
//! ## Supported elements
//!
//! | id | ext id | Element |
//! |-----|--------|------------------|
//! | 48 | - | RSN |
//! | 244 | - | RSN Extension |
//! | 45 | - | HT Capabilities |
//! | 191 | - | VHT Capabilities |
//! | 221 | - | Vendor (WPS) |
//! | 255 | 35 | HE Capabilities |
//! | 255 | 36 | HE Operation |
//! | 255 | 106 | EHT Capabilities |

pub mod eht;
pub mod he;
pub mod ht;
pub mod rsn;
pub mod vht;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::{WifiBand, WifiStandard};
use crate::wire::oui_matches;

pub use eht::{EhtCapabilities, MloMode, parse_eht_capabilities};
pub use he::{HeCapabilities, HeOperation, parse_he_capabilities, parse_he_operation};
pub use ht::{HtCapabilities, parse_ht_capabilities};
pub use rsn::{
    AkmSuite, AkmSuiteInfo, CipherSuite, CipherSuiteInfo, RsnExtension, RsnInfo, akm_suite_info,
    cipher_suite_info, parse_rsn, parse_rsn_extension,
};
pub use vht::{VhtCapabilities, parse_vht_capabilities};

/// Element id: RSN
pub const EID_RSN: u8 = 48;
/// Element id: RSN Extension
pub const EID_RSN_EXTENSION: u8 = 244;
/// Element id: HT Capabilities
pub const EID_HT_CAPABILITIES: u8 = 45;
/// Element id: VHT Capabilities
pub const EID_VHT_CAPABILITIES: u8 = 191;
/// Element id: vendor-specific
pub const EID_VENDOR: u8 = 221;
/// Element id: extension escape
pub const EID_EXTENSION: u8 = 255;
/// Extension id: HE Capabilities
pub const EID_EXT_HE_CAPABILITIES: u8 = 35;
/// Extension id: HE Operation
pub const EID_EXT_HE_OPERATION: u8 = 36;
/// Extension id: EHT Capabilities
pub const EID_EXT_EHT_CAPABILITIES: u8 = 106;

/// Microsoft OUI carried by WPS vendor elements
pub const MICROSOFT_OUI: [u8; 3] = [0x00, 0x50, 0xF2];
/// Vendor type byte marking a WPS element under the Microsoft OUI
pub const WPS_VENDOR_TYPE: u8 = 0x04;

/// One raw Information Element as captured from a beacon or probe response
///
/// The payload excludes the 2-byte (id, length) header. For extended
/// elements (id 255) the payload still starts with the 1-byte extension id,
/// mirrored in `ext_id` for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIe {
    /// Element id
    pub id: u8,
    /// Element extension id; meaningful only when `id` is 255
    pub ext_id: u8,
    /// Element body
    pub payload: Vec<u8>,
}

impl RawIe {
    /// Create a plain element
    pub fn new(id: u8, payload: impl Into<Vec<u8>>) -> Self {
        let payload = payload.into();
        let ext_id = if id == EID_EXTENSION {
            payload.first().copied().unwrap_or(0)
        } else {
            0
        };
        Self {
            id,
            ext_id,
            payload,
        }
    }
}

/// Typed capability model for one BSS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedInformationElements {
    /// RSN security element
    pub rsn: Option<RsnInfo>,
    /// RSN Extension element
    pub rsn_extension: Option<RsnExtension>,
    /// HT capabilities (WiFi 4)
    pub ht: Option<HtCapabilities>,
    /// VHT capabilities (WiFi 5)
    pub vht: Option<VhtCapabilities>,
    /// HE capabilities (WiFi 6)
    pub he: Option<HeCapabilities>,
    /// HE operation parameters
    pub he_operation: Option<HeOperation>,
    /// EHT capabilities (WiFi 7)
    pub eht: Option<EhtCapabilities>,
    /// WPS advertised via the Microsoft vendor element
    pub wps_enabled: bool,
    /// Highest generation the capability set supports
    pub wifi_generation: WifiStandard,
}

impl ParsedInformationElements {
    /// Highest Wi-Fi generation present, with the observed band deciding
    /// between WiFi 6 and WiFi 6E
    fn derive_generation(&self, band: Option<WifiBand>) -> WifiStandard {
        if self.eht.is_some() {
            WifiStandard::Wifi7
        } else if self.he.is_some() {
            match band {
                Some(WifiBand::Band6GHz) => WifiStandard::Wifi6E,
                _ => WifiStandard::Wifi6,
            }
        } else if self.vht.is_some() {
            WifiStandard::Wifi5
        } else if self.ht.is_some() {
            WifiStandard::Wifi4
        } else {
            WifiStandard::Legacy
        }
    }

    /// Any WPA3-family AKM advertised
    pub fn is_wpa3(&self) -> bool {
        self.rsn.as_ref().is_some_and(RsnInfo::is_wpa3)
    }

    /// Management frame protection is mandatory on this BSS
    pub fn pmf_required(&self) -> bool {
        self.rsn.as_ref().is_some_and(|rsn| rsn.pmf_required)
    }

    /// Short security posture summary
    pub fn security_label(&self) -> &'static str {
        let Some(rsn) = &self.rsn else {
            return "Open";
        };
        let has_legacy_akm = rsn
            .akm_suites
            .iter()
            .any(|akm| matches!(akm, AkmSuite::Psk | AkmSuite::PskSha256));
        match (rsn.is_wpa3(), has_legacy_akm) {
            (true, true) => "WPA2/WPA3 transition",
            (true, false) => "WPA3",
            (false, _) => "WPA2",
        }
    }
}

/// Decode a set of IEs into one capability record
///
/// Equivalent to [`parse_information_elements_on_band`] with an unknown
/// band, so HE capabilities resolve to WiFi 6 rather than WiFi 6E.
pub fn parse_information_elements(elements: &[RawIe]) -> ParsedInformationElements {
    parse_information_elements_on_band(elements, None)
}

/// Decode a set of IEs into one capability record, using the band the BSS
/// was observed on to distinguish WiFi 6E from WiFi 6
pub fn parse_information_elements_on_band(
    elements: &[RawIe],
    band: Option<WifiBand>,
) -> ParsedInformationElements {
    let mut parsed = ParsedInformationElements::default();
    for element in elements {
        match element.id {
            EID_RSN => parsed.rsn = Some(parse_rsn(&element.payload)),
            EID_RSN_EXTENSION => {
                parsed.rsn_extension = Some(parse_rsn_extension(&element.payload));
            }
            EID_HT_CAPABILITIES => parsed.ht = Some(parse_ht_capabilities(&element.payload)),
            EID_VHT_CAPABILITIES => parsed.vht = Some(parse_vht_capabilities(&element.payload)),
            EID_VENDOR => {
                if is_wps_vendor_element(&element.payload) {
                    parsed.wps_enabled = true;
                }
            }
            EID_EXTENSION => match element.ext_id {
                EID_EXT_HE_CAPABILITIES => {
                    parsed.he = Some(parse_he_capabilities(&element.payload));
                }
                EID_EXT_HE_OPERATION => {
                    parsed.he_operation = Some(parse_he_operation(&element.payload));
                }
                EID_EXT_EHT_CAPABILITIES => {
                    parsed.eht = Some(parse_eht_capabilities(&element.payload));
                }
                other => trace!(ext_id = other, "ignoring unknown extension element"),
            },
            other => trace!(id = other, "ignoring unknown element"),
        }
    }
    parsed.wifi_generation = parsed.derive_generation(band);
    parsed
}

fn is_wps_vendor_element(payload: &[u8]) -> bool {
    oui_matches(payload, MICROSOFT_OUI) && payload.get(3) == Some(&WPS_VENDOR_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsn_wpa3() -> RawIe {
        RawIe::new(EID_RSN, vec![
            0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00,
            0x00, 0x0F, 0xAC, 0x08, 0x80, 0x00,
        ])
    }

    fn ht_basic() -> RawIe {
        let mut body = vec![0u8; 26];
        body[0] = 0x02;
        body[3] = 0xFF;
        RawIe::new(EID_HT_CAPABILITIES, body)
    }

    fn he_basic() -> RawIe {
        let mut body = vec![0x23];
        body.extend_from_slice(&[0u8; 17]);
        RawIe::new(EID_EXTENSION, body)
    }

    fn eht_basic() -> RawIe {
        let mut body = vec![0x6A];
        body.extend_from_slice(&[0u8; 11]);
        RawIe::new(EID_EXTENSION, body)
    }

    #[test]
    fn empty_input_is_legacy() {
        let parsed = parse_information_elements(&[]);
        assert_eq!(parsed.wifi_generation, WifiStandard::Legacy);
        assert_eq!(parsed.security_label(), "Open");
        assert!(!parsed.wps_enabled);
    }

    #[test]
    fn generation_is_highest_present() {
        let parsed = parse_information_elements(&[ht_basic()]);
        assert_eq!(parsed.wifi_generation, WifiStandard::Wifi4);

        let parsed = parse_information_elements(&[ht_basic(), he_basic()]);
        assert_eq!(parsed.wifi_generation, WifiStandard::Wifi6);

        let parsed = parse_information_elements(&[he_basic(), eht_basic(), ht_basic()]);
        assert_eq!(parsed.wifi_generation, WifiStandard::Wifi7);
    }

    #[test]
    fn six_ghz_band_upgrades_he_to_6e() {
        let parsed =
            parse_information_elements_on_band(&[he_basic()], Some(WifiBand::Band6GHz));
        assert_eq!(parsed.wifi_generation, WifiStandard::Wifi6E);

        let parsed = parse_information_elements_on_band(&[he_basic()], Some(WifiBand::Band5GHz));
        assert_eq!(parsed.wifi_generation, WifiStandard::Wifi6);
    }

    #[test]
    fn wps_vendor_element() {
        let wps = RawIe::new(EID_VENDOR, vec![0x00, 0x50, 0xF2, 0x04, 0x10, 0x4A]);
        assert!(parse_information_elements(&[wps]).wps_enabled);

        // Same OUI, different vendor type
        let not_wps = RawIe::new(EID_VENDOR, vec![0x00, 0x50, 0xF2, 0x02, 0x01]);
        assert!(!parse_information_elements(&[not_wps]).wps_enabled);

        // Different OUI entirely
        let other = RawIe::new(EID_VENDOR, vec![0x00, 0x10, 0x18, 0x04]);
        assert!(!parse_information_elements(&[other]).wps_enabled);
    }

    #[test]
    fn unknown_elements_contribute_nothing() {
        let parsed = parse_information_elements(&[
            RawIe::new(0, b"ssid".to_vec()),
            RawIe::new(3, vec![6]),
            RawIe::new(EID_EXTENSION, vec![0x77, 0x01, 0x02]),
            rsn_wpa3(),
        ]);
        assert!(parsed.rsn.is_some());
        assert_eq!(parsed.security_label(), "WPA3");
        assert!(parsed.is_wpa3());
    }

    #[test]
    fn last_writer_wins_on_duplicates() {
        let open_rsn = RawIe::new(EID_RSN, vec![
            0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00,
            0x00, 0x0F, 0xAC, 0x02, 0x00, 0x00,
        ]);
        let parsed = parse_information_elements(&[open_rsn.clone(), rsn_wpa3()]);
        assert_eq!(parsed.rsn.unwrap().akm_suites, vec![AkmSuite::Sae]);

        let parsed = parse_information_elements(&[rsn_wpa3(), open_rsn]);
        assert_eq!(parsed.rsn.unwrap().akm_suites, vec![AkmSuite::Psk]);
    }

    #[test]
    fn transition_mode_label() {
        let transition = RawIe::new(EID_RSN, vec![
            0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x02, 0x00,
            0x00, 0x0F, 0xAC, 0x02, 0x00, 0x0F, 0xAC, 0x08, 0x80, 0x00,
        ]);
        let parsed = parse_information_elements(&[transition]);
        assert_eq!(parsed.security_label(), "WPA2/WPA3 transition");
    }

    #[test]
    fn raw_ie_mirrors_extension_id() {
        let ie = RawIe::new(EID_EXTENSION, vec![0x23, 0x00]);
        assert_eq!(ie.ext_id, 0x23);
        let ie = RawIe::new(EID_RSN, vec![0x23, 0x00]);
        assert_eq!(ie.ext_id, 0);
    }
}
