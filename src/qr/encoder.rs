//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{Rgb, RgbImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

/// Pixels per QR module when nothing else is configured
pub const DEFAULT_MODULE_SIZE: u32 = 10;
/// Largest module size; keeps a version 40 symbol within the canvas limit
pub const MAX_MODULE_SIZE: u32 = 100;

/// A rendered QR symbol plus the metadata the encoder picked for it
#[derive(Debug, Clone)]
pub struct EncodedQr {
    /// Rendered symbol, quiet zone included when enabled
    pub image: RgbImage,
    /// Symbol version (1..=40)
    pub version: i16,
    /// Modules per side, excluding the quiet zone
    pub modules: usize,
    /// Error correction level used
    pub ecc_level: EcLevel,
}

/// QR code encoder
#[derive(Debug, Clone)]
pub struct QrEncoder {
    /// Error correction level
    ecc_level: EcLevel,
    module_size: u32,
    quiet_zone: bool,
    dark: Rgb<u8>,
    light: Rgb<u8>,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (Medium ECC, 10px modules, black on white)
    pub fn new() -> Self {
        Self {
            ecc_level: EcLevel::M,
            module_size: DEFAULT_MODULE_SIZE,
            quiet_zone: true,
            dark: Rgb([0, 0, 0]),
            light: Rgb([255, 255, 255]),
        }
    }

    /// Create a new QR encoder with a specific error correction level
    pub fn with_ecc_level(ecc_level: EcLevel) -> Self {
        Self {
            ecc_level,
            ..Self::new()
        }
    }

    /// Set the pixel size of one module (clamped to 1..=[`MAX_MODULE_SIZE`])
    pub fn module_size(mut self, px: u32) -> Self {
        self.module_size = px.clamp(1, MAX_MODULE_SIZE);
        self
    }

    /// Toggle the 4-module light border around the symbol
    pub fn quiet_zone(mut self, enabled: bool) -> Self {
        self.quiet_zone = enabled;
        self
    }

    /// Set dark and light module colours
    pub fn colors(mut self, dark: Rgb<u8>, light: Rgb<u8>) -> Self {
        self.dark = dark;
        self.light = light;
        self
    }

    /// Encode data into a QR code image
    pub fn encode(&self, payload: &QrPayload) -> Result<EncodedQr> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ecc_level)
            .map_err(|e| match e {
                QrError::DataTooLong => Error::QrEncode(format!(
                    "payload of {} bytes exceeds QR capacity at error correction level {:?}",
                    payload.len(),
                    self.ecc_level
                )),
                other => Error::QrEncode(format!("Failed to create QR code: {}", other)),
            })?;

        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };

        let image = code
            .render::<Rgb<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .quiet_zone(self.quiet_zone)
            .dark_color(self.dark)
            .light_color(self.light)
            .build();

        tracing::debug!(
            version,
            modules = code.width(),
            width = image.width(),
            ecc = ?self.ecc_level,
            "Encoded QR symbol"
        );

        Ok(EncodedQr {
            image,
            version,
            modules: code.width(),
            ecc_level: self.ecc_level,
        })
    }

    /// Encode a string into a QR code image
    pub fn encode_string(&self, data: &str) -> Result<EncodedQr> {
        let payload = QrPayload::from_string(data.to_string());
        self.encode(&payload)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_string() {
        let encoder = QrEncoder::new();
        let encoded = encoder.encode_string("Hello, QR").unwrap();
        // (modules + 2 * 4 quiet zone modules) * 10px
        let expected = (encoded.modules as u32 + 8) * DEFAULT_MODULE_SIZE;
        assert_eq!(encoded.image.width(), expected);
        assert_eq!(encoded.image.height(), expected);
        assert_eq!(encoded.version, 1);
    }

    #[test]
    fn test_module_size_is_clamped() {
        let encoded = QrEncoder::new()
            .module_size(u32::MAX)
            .encode_string("clamp")
            .unwrap();
        assert_eq!(encoded.image.width(), (encoded.modules as u32 + 8) * MAX_MODULE_SIZE);
    }

    #[test]
    fn test_module_size_and_quiet_zone() {
        let encoded = QrEncoder::new()
            .module_size(3)
            .quiet_zone(false)
            .encode_string("abc")
            .unwrap();
        assert_eq!(encoded.image.width(), encoded.modules as u32 * 3);
        // finder pattern corner is dark without a quiet zone
        assert_eq!(*encoded.image.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_oversized_payload_fails() {
        let encoder = QrEncoder::with_ecc_level(EcLevel::H);
        let data = "x".repeat(4000);
        let err = encoder.encode_string(&data).unwrap_err();
        assert!(matches!(err, Error::QrEncode(_)));
    }

    #[test]
    fn test_round_trip() {
        use crate::qr::QrDecoder;

        let encoder = QrEncoder::new();
        let decoder = QrDecoder::new();

        let original = "Test payload for round trip";
        let encoded = encoder.encode_string(original).unwrap();
        let decoded = decoder.decode_rgb(&encoded.image).unwrap();

        assert_eq!(decoded.as_str(), Some(original));
    }
}
