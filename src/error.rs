//! # Crate error type
//!
//! All fallible public operations return [`NetkitResult`]. The variants cover
//! caller-side precondition violations only: truncated or malformed IEs are
//! swallowed by the decoder (yielding defaulted records), and unsupported
//! (standard, width) combinations surface as `None` from the RF lookups
//! rather than as errors.

use thiserror::Error;

/// Errors raised at the public API boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetkitError {
    /// A required text field was empty or whitespace-only
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    /// The scan snapshot contains no BSS belonging to the surveyed SSID
    #[error("snapshot contains no BSS for ssid {ssid:?}")]
    SsidMismatch { ssid: String },

    /// Text that does not parse as a colon-separated MAC address
    #[error("malformed bssid {0:?}")]
    MalformedBssid(String),

    /// RSSI outside the supported [-120, 0] dBm range
    #[error("rssi {0} dBm is outside [-120, 0]")]
    RssiOutOfRange(i32),

    /// Spatial-stream count outside [1, 16]
    #[error("nss {0} is outside [1, 16]")]
    NssOutOfRange(u8),

    /// MCS index outside [0, 13]
    #[error("mcs {0} is outside [0, 13]")]
    McsOutOfRange(u8),

    /// Grid resolution must be strictly positive
    #[error("grid resolution must be positive, got {0} m")]
    InvalidResolution(f64),

    /// Bounds with negative width or height
    #[error("bounds are inverted: ({min_x}, {min_y}) .. ({max_x}, {max_y})")]
    InvalidBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    /// Channel number the band does not define
    #[error("channel {channel} is not valid on the {band} band")]
    InvalidChannel {
        band: crate::types::WifiBand,
        channel: u16,
    },

    /// Measurements can only be appended while a session is in progress
    #[error("survey session is not in progress")]
    SessionNotInProgress,

    /// Spatial analysis needs at least one measurement
    #[error("survey session has no measurements")]
    EmptySurvey,
}

/// Shorthand result alias used across the crate
pub type NetkitResult<T> = Result<T, NetkitError>;
