//! # RSN and RSN Extension elements
//!
//! Decodes the Robust Security Network element (id 48) into cipher and AKM
//! suite lists plus management-frame-protection flags, and the RSN Extension
//! element (id 244) for WPA3 hash-to-element signaling.
//!
//! Suite selectors are 4 bytes: a 3-byte OUI followed by a type byte. The
//! WiFi Alliance OUI is `00:0F:AC`; selectors under any other OUI map to
//! `VendorSpecific`, unknown types under the WFA OUI map to `Unknown`.
//! Display names, deprecation and nominal security levels are data tables
//! keyed by variant, not behavior attached to the variants.

use serde::{Deserialize, Serialize};

use crate::wire::{ByteCursor, bit16};

/// WiFi Alliance OUI used by standard cipher and AKM selectors
pub const WFA_OUI: [u8; 3] = [0x00, 0x0F, 0xAC];

/// Pairwise / group cipher suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    /// Type 0, pairwise list only
    UseGroupCipher,
    Wep40,
    Tkip,
    Ccmp128,
    Wep104,
    BipCmac128,
    Gcmp128,
    Gcmp256,
    Ccmp256,
    BipGmac128,
    BipGmac256,
    BipCmac256,
    /// WFA OUI with a type byte this crate does not know
    Unknown(u8),
    /// Selector under a non-WFA OUI
    VendorSpecific { oui: [u8; 3], suite_type: u8 },
}

impl CipherSuite {
    /// Decode a 4-byte suite selector
    pub fn from_selector(selector: &[u8]) -> CipherSuite {
        if selector.len() < 4 {
            return CipherSuite::Unknown(0);
        }
        let oui = [selector[0], selector[1], selector[2]];
        let suite_type = selector[3];
        if oui != WFA_OUI {
            return CipherSuite::VendorSpecific { oui, suite_type };
        }
        match suite_type {
            0 => CipherSuite::UseGroupCipher,
            1 => CipherSuite::Wep40,
            2 => CipherSuite::Tkip,
            4 => CipherSuite::Ccmp128,
            5 => CipherSuite::Wep104,
            6 => CipherSuite::BipCmac128,
            8 => CipherSuite::Gcmp128,
            9 => CipherSuite::Gcmp256,
            10 => CipherSuite::Ccmp256,
            11 => CipherSuite::BipGmac128,
            12 => CipherSuite::BipGmac256,
            13 => CipherSuite::BipCmac256,
            other => CipherSuite::Unknown(other),
        }
    }
}

/// Static per-cipher data looked up by [`cipher_suite_info`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuiteInfo {
    /// Display name
    pub name: &'static str,
    /// Considered broken or phased out
    pub deprecated: bool,
    /// Protects data frames (BIP variants protect management frames only)
    pub data_cipher: bool,
    /// Uses a 256-bit key
    pub key_256_bit: bool,
    /// Nominal security level in [0, 100]
    pub security_level: u8,
}

const fn cipher_row(
    name: &'static str,
    deprecated: bool,
    data_cipher: bool,
    key_256_bit: bool,
    security_level: u8,
) -> CipherSuiteInfo {
    CipherSuiteInfo {
        name,
        deprecated,
        data_cipher,
        key_256_bit,
        security_level,
    }
}

/// Data table for cipher suites, one row per variant
///
/// Columns: name, deprecated, data cipher, 256-bit key, security level.
pub const fn cipher_suite_info(suite: CipherSuite) -> CipherSuiteInfo {
    match suite {
        CipherSuite::UseGroupCipher => cipher_row("Use Group Cipher", false, true, false, 20),
        CipherSuite::Wep40 => cipher_row("WEP-40", true, true, false, 5),
        CipherSuite::Tkip => cipher_row("TKIP", true, true, false, 25),
        CipherSuite::Ccmp128 => cipher_row("CCMP-128", false, true, false, 70),
        CipherSuite::Wep104 => cipher_row("WEP-104", true, true, false, 10),
        CipherSuite::BipCmac128 => cipher_row("BIP-CMAC-128", false, false, false, 70),
        CipherSuite::Gcmp128 => cipher_row("GCMP-128", false, true, false, 80),
        CipherSuite::Gcmp256 => cipher_row("GCMP-256", false, true, true, 90),
        CipherSuite::Ccmp256 => cipher_row("CCMP-256", false, true, true, 85),
        CipherSuite::BipGmac128 => cipher_row("BIP-GMAC-128", false, false, false, 80),
        CipherSuite::BipGmac256 => cipher_row("BIP-GMAC-256", false, false, true, 90),
        CipherSuite::BipCmac256 => cipher_row("BIP-CMAC-256", false, false, true, 85),
        CipherSuite::Unknown(_) => cipher_row("Unknown", false, true, false, 0),
        CipherSuite::VendorSpecific { .. } => cipher_row("Vendor Specific", false, true, false, 0),
    }
}

/// Authentication and key management suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AkmSuite {
    /// Type 1: WPA2-Enterprise (802.1X)
    Ieee8021X,
    /// Type 2: WPA2-Personal (PSK)
    Psk,
    /// Type 3: fast transition with 802.1X
    FtIeee8021X,
    /// Type 4: fast transition with PSK
    FtPsk,
    /// Type 5: 802.1X with SHA-256
    Ieee8021XSha256,
    /// Type 6: PSK with SHA-256
    PskSha256,
    /// Type 8: WPA3-Personal (SAE)
    Sae,
    /// Type 9: fast transition with SAE
    FtSae,
    /// Type 11: WPA3-Enterprise (Suite B, SHA-256)
    SuiteBSha256,
    /// Type 12: WPA3-Enterprise 192-bit (Suite B, SHA-384)
    SuiteBSha384,
    /// Type 13: fast transition with 802.1X, SHA-384
    FtIeee8021XSha384,
    /// Type 18: Enhanced Open (OWE)
    Owe,
    /// Type 24: SAE with public key
    SaePk,
    /// WFA OUI with a type byte this crate does not know
    Unknown(u8),
    /// Selector under a non-WFA OUI
    VendorSpecific { oui: [u8; 3], suite_type: u8 },
}

impl AkmSuite {
    /// Decode a 4-byte suite selector
    pub fn from_selector(selector: &[u8]) -> AkmSuite {
        if selector.len() < 4 {
            return AkmSuite::Unknown(0);
        }
        let oui = [selector[0], selector[1], selector[2]];
        let suite_type = selector[3];
        if oui != WFA_OUI {
            return AkmSuite::VendorSpecific { oui, suite_type };
        }
        match suite_type {
            1 => AkmSuite::Ieee8021X,
            2 => AkmSuite::Psk,
            3 => AkmSuite::FtIeee8021X,
            4 => AkmSuite::FtPsk,
            5 => AkmSuite::Ieee8021XSha256,
            6 => AkmSuite::PskSha256,
            8 => AkmSuite::Sae,
            9 => AkmSuite::FtSae,
            11 => AkmSuite::SuiteBSha256,
            12 => AkmSuite::SuiteBSha384,
            13 => AkmSuite::FtIeee8021XSha384,
            18 => AkmSuite::Owe,
            24 => AkmSuite::SaePk,
            other => AkmSuite::Unknown(other),
        }
    }
}

/// Static per-AKM data looked up by [`akm_suite_info`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AkmSuiteInfo {
    /// Display name
    pub name: &'static str,
    /// Considered weak by current guidance
    pub deprecated: bool,
    /// WPA3 family membership (SAE and Suite-B-192)
    pub wpa3: bool,
    /// Nominal security level in [0, 100]
    pub security_level: u8,
}

const fn akm_row(
    name: &'static str,
    deprecated: bool,
    wpa3: bool,
    security_level: u8,
) -> AkmSuiteInfo {
    AkmSuiteInfo {
        name,
        deprecated,
        wpa3,
        security_level,
    }
}

/// Data table for AKM suites, one row per variant
///
/// Columns: name, deprecated, WPA3 family, security level.
pub const fn akm_suite_info(suite: AkmSuite) -> AkmSuiteInfo {
    match suite {
        AkmSuite::Ieee8021X => akm_row("WPA2-Enterprise (802.1X)", false, false, 60),
        AkmSuite::Psk => akm_row("WPA2-Personal (PSK)", true, false, 50),
        AkmSuite::FtIeee8021X => akm_row("FT-802.1X", false, false, 65),
        AkmSuite::FtPsk => akm_row("FT-PSK", false, false, 55),
        AkmSuite::Ieee8021XSha256 => akm_row("802.1X-SHA256", false, false, 65),
        AkmSuite::PskSha256 => akm_row("PSK-SHA256", false, false, 55),
        AkmSuite::Sae => akm_row("WPA3-Personal (SAE)", false, true, 80),
        AkmSuite::FtSae => akm_row("FT-SAE", false, true, 85),
        AkmSuite::SuiteBSha256 => akm_row("WPA3-Enterprise", false, false, 85),
        AkmSuite::SuiteBSha384 => akm_row("WPA3-Enterprise 192-bit", false, true, 95),
        AkmSuite::FtIeee8021XSha384 => akm_row("FT-802.1X-SHA384", false, false, 90),
        AkmSuite::Owe => akm_row("Enhanced Open (OWE)", false, false, 45),
        AkmSuite::SaePk => akm_row("SAE-PK", false, true, 90),
        AkmSuite::Unknown(_) => akm_row("Unknown", false, false, 0),
        AkmSuite::VendorSpecific { .. } => akm_row("Vendor Specific", false, false, 0),
    }
}

/// Decoded RSN element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsnInfo {
    /// RSN version (1 for every deployed network)
    pub version: u16,
    /// Group (broadcast/multicast) data cipher
    pub group_cipher: CipherSuite,
    /// Pairwise (unicast) ciphers
    pub pairwise_ciphers: Vec<CipherSuite>,
    /// Authentication and key management suites
    pub akm_suites: Vec<AkmSuite>,
    /// Management frame protection supported
    pub pmf_capable: bool,
    /// Management frame protection mandatory
    pub pmf_required: bool,
    /// Beacon protection supported
    pub beacon_protection_capable: bool,
    /// Beacon protection mandatory
    pub beacon_protection_required: bool,
}

impl Default for RsnInfo {
    fn default() -> Self {
        Self {
            version: 1,
            group_cipher: CipherSuite::Ccmp128,
            pairwise_ciphers: Vec::new(),
            akm_suites: Vec::new(),
            pmf_capable: false,
            pmf_required: false,
            beacon_protection_capable: false,
            beacon_protection_required: false,
        }
    }
}

impl RsnInfo {
    /// Any WPA3-family AKM present
    pub fn is_wpa3(&self) -> bool {
        self.akm_suites.iter().any(|akm| akm_suite_info(*akm).wpa3)
    }

    /// Any 256-bit cipher present (group or pairwise)
    pub fn has_256_bit_cipher(&self) -> bool {
        cipher_suite_info(self.group_cipher).key_256_bit
            || self
                .pairwise_ciphers
                .iter()
                .any(|cipher| cipher_suite_info(*cipher).key_256_bit)
    }
}

// RSN capability bits
const CAP_PMF_REQUIRED: u8 = 6;
const CAP_PMF_CAPABLE: u8 = 7;
const CAP_BEACON_PROT_CAPABLE: u8 = 12;
const CAP_BEACON_PROT_REQUIRED: u8 = 13;

/// Parse an RSN element body (id 48)
///
/// Consumes version, group cipher, pairwise list, AKM list and the
/// capability word in order, stopping gracefully wherever the payload ends.
/// Trailing PMKID and group-management-cipher fields are not interpreted.
pub fn parse_rsn(payload: &[u8]) -> RsnInfo {
    let mut info = RsnInfo::default();
    parse_rsn_fields(&mut ByteCursor::new(payload), &mut info);

    // SAE mandates management frame protection even when the capability bit
    // was not observed (truncated element or transition-mode quirk).
    if info.is_wpa3() {
        info.pmf_capable = true;
    }
    info
}

// Fields are positional: once one cannot be read in full, nothing after it
// may be interpreted.
fn parse_rsn_fields(cur: &mut ByteCursor<'_>, info: &mut RsnInfo) {
    if cur.remaining() < 2 {
        return;
    }
    info.version = cur.read_u16();

    if cur.remaining() < 4 {
        return;
    }
    info.group_cipher = CipherSuite::from_selector(cur.take(4));

    if cur.remaining() < 2 {
        return;
    }
    let pairwise_count = cur.read_u16() as usize;
    for _ in 0..pairwise_count {
        if cur.remaining() < 4 {
            return;
        }
        info.pairwise_ciphers
            .push(CipherSuite::from_selector(cur.take(4)));
    }

    if cur.remaining() < 2 {
        return;
    }
    let akm_count = cur.read_u16() as usize;
    for _ in 0..akm_count {
        if cur.remaining() < 4 {
            return;
        }
        info.akm_suites.push(AkmSuite::from_selector(cur.take(4)));
    }

    if cur.remaining() < 2 {
        return;
    }
    let caps = cur.read_u16();
    info.pmf_required = bit16(caps, CAP_PMF_REQUIRED);
    info.pmf_capable = bit16(caps, CAP_PMF_CAPABLE);
    info.beacon_protection_capable = bit16(caps, CAP_BEACON_PROT_CAPABLE);
    info.beacon_protection_required = bit16(caps, CAP_BEACON_PROT_REQUIRED);
}

/// Decoded RSN Extension element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsnExtension {
    /// SAE hash-to-element supported
    pub h2e_support: bool,
    /// SAE-PK identifier TLV, preserved verbatim when decoded
    pub sae_pk_identifier: Option<Vec<u8>>,
}

/// Parse an RSN Extension element body (id 244)
///
/// Only the H2E bit is interpreted; the SAE-PK identifier TLV is left
/// undecoded.
pub fn parse_rsn_extension(payload: &[u8]) -> RsnExtension {
    RsnExtension {
        h2e_support: payload.first().is_some_and(|b| b & 0x01 != 0),
        sae_pk_identifier: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // version=1, group=CCMP, 1 pairwise CCMP, 1 AKM SAE, caps with bit 7
    const RSN_WPA3: [u8; 20] = [
        0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00,
        0x0F, 0xAC, 0x08, 0x80, 0x00,
    ];

    #[test]
    fn parses_wpa3_personal() {
        let info = parse_rsn(&RSN_WPA3);
        assert_eq!(info.version, 1);
        assert_eq!(info.group_cipher, CipherSuite::Ccmp128);
        assert_eq!(info.pairwise_ciphers, vec![CipherSuite::Ccmp128]);
        assert_eq!(info.akm_suites, vec![AkmSuite::Sae]);
        assert!(info.pmf_capable);
        assert!(!info.pmf_required);
        assert!(info.is_wpa3());
    }

    #[test]
    fn short_payload_keeps_parsed_prefix() {
        // Version and group cipher only
        let info = parse_rsn(&[0x01, 0x00, 0x00, 0x0F, 0xAC, 0x02]);
        assert_eq!(info.version, 1);
        assert_eq!(info.group_cipher, CipherSuite::Tkip);
        assert!(info.pairwise_ciphers.is_empty());
        assert!(info.akm_suites.is_empty());
        assert!(!info.pmf_capable);
    }

    #[test]
    fn truncated_suite_list_stops_cleanly() {
        // Pairwise count says 4 but only one selector fits
        let mut payload = vec![0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x04, 0x00];
        payload.extend_from_slice(&[0x00, 0x0F, 0xAC, 0x04]);
        let info = parse_rsn(&payload);
        assert_eq!(info.pairwise_ciphers, vec![CipherSuite::Ccmp128]);
    }

    #[test]
    fn vendor_and_unknown_suites() {
        assert_eq!(
            CipherSuite::from_selector(&[0x00, 0x10, 0x18, 0x02]),
            CipherSuite::VendorSpecific {
                oui: [0x00, 0x10, 0x18],
                suite_type: 2
            }
        );
        assert_eq!(
            CipherSuite::from_selector(&[0x00, 0x0F, 0xAC, 0x77]),
            CipherSuite::Unknown(0x77)
        );
        assert_eq!(
            AkmSuite::from_selector(&[0x00, 0x0F, 0xAC, 0x63]),
            AkmSuite::Unknown(0x63)
        );
    }

    #[test]
    fn sae_forces_pmf_capable() {
        // Same AKM but a capability word with no PMF bits
        let mut payload = RSN_WPA3.to_vec();
        payload[18] = 0x00;
        assert!(parse_rsn(&payload).pmf_capable);
    }

    #[test]
    fn wpa3_enterprise_192_carries_256_bit_cipher() {
        let payload = [
            0x01, 0x00, 0x00, 0x0F, 0xAC, 0x09, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x09, 0x01, 0x00,
            0x00, 0x0F, 0xAC, 0x0C, 0xC0, 0x00,
        ];
        let info = parse_rsn(&payload);
        assert_eq!(info.akm_suites, vec![AkmSuite::SuiteBSha384]);
        assert!(info.has_256_bit_cipher());
        assert!(info.pmf_required);
    }

    #[test]
    fn rsn_extension_h2e() {
        assert!(parse_rsn_extension(&[0x01]).h2e_support);
        assert!(!parse_rsn_extension(&[0x02]).h2e_support);
        assert!(!parse_rsn_extension(&[]).h2e_support);
        assert_eq!(parse_rsn_extension(&[0x01]).sae_pk_identifier, None);
    }

    #[test]
    fn suite_tables_are_total() {
        for suite in [
            CipherSuite::Wep40,
            CipherSuite::Tkip,
            CipherSuite::Ccmp128,
            CipherSuite::Gcmp256,
            CipherSuite::Unknown(0x55),
        ] {
            let info = cipher_suite_info(suite);
            assert!(!info.name.is_empty());
            assert!(info.security_level <= 100);
        }
        assert!(cipher_suite_info(CipherSuite::Wep104).deprecated);
        assert!(!cipher_suite_info(CipherSuite::BipGmac256).data_cipher);
        assert!(akm_suite_info(AkmSuite::SuiteBSha384).wpa3);
        assert!(!akm_suite_info(AkmSuite::Psk).wpa3);
        assert_eq!(akm_suite_info(AkmSuite::Sae).name, "WPA3-Personal (SAE)");
    }
}
