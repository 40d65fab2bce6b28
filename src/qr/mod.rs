//! QR code encoding and decoding
//!
//! Encoding wraps the `qrcode` crate and renders straight to an RGB bitmap;
//! decoding uses `rqrr` and exists so generated images can be checked for
//! round-trip fidelity.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::{DEFAULT_MODULE_SIZE, EncodedQr, MAX_MODULE_SIZE, QrEncoder};

pub use qrcode::EcLevel;

use serde::{Deserialize, Serialize};

/// Payload carried by a QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The raw data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the payload carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Parse an error-correction level name (`L`, `M`, `Q`, `H`, case-insensitive).
pub fn parse_ec_level(value: &str) -> Option<EcLevel> {
    match value.trim().to_ascii_uppercase().as_str() {
        "L" | "LOW" => Some(EcLevel::L),
        "M" | "MEDIUM" => Some(EcLevel::M),
        "Q" | "QUARTILE" => Some(EcLevel::Q),
        "H" | "HIGH" => Some(EcLevel::H),
        _ => None,
    }
}

/// Single-letter name of an error-correction level.
pub fn ec_level_name(level: EcLevel) -> &'static str {
    match level {
        EcLevel::L => "L",
        EcLevel::M => "M",
        EcLevel::Q => "Q",
        EcLevel::H => "H",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_payload_from_string() {
        let payload = QrPayload::from_string("hello world".to_string());
        assert_eq!(payload.as_str(), Some("hello world"));
        assert_eq!(payload.as_bytes(), b"hello world");
        assert_eq!(payload.len(), 11);
    }

    #[test]
    fn test_parse_ec_level() {
        assert_eq!(parse_ec_level("m"), Some(EcLevel::M));
        assert_eq!(parse_ec_level(" H "), Some(EcLevel::H));
        assert_eq!(parse_ec_level("quartile"), Some(EcLevel::Q));
        assert_eq!(parse_ec_level("x"), None);
        assert_eq!(ec_level_name(EcLevel::L), "L");
    }
}
