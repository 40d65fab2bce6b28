//! Error types for qrcaption operations

use thiserror::Error;

/// Result type alias using qrcaption's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrcaption operations
#[derive(Error, Debug)]
pub enum Error {
    /// Empty or otherwise unusable input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// QR code encoding failed (usually the payload exceeds symbol capacity)
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// Decoded payload differs from the text that was encoded
    #[error("Round trip mismatch: expected {expected:?}, decoded {decoded:?}")]
    RoundTripMismatch {
        /// Text that was encoded
        expected: String,
        /// Text read back from the image
        decoded: String,
    },

    /// Caption font could not be loaded
    #[error("Font error: {0}")]
    Font(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

// Implement From conversions for common error types

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            // Write failures (permissions, missing directory) surface as plain I/O errors
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Image(other.to_string()),
        }
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrEncode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_io_error_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(image::ImageError::IoError(io));
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_qr_error_maps_to_encode() {
        let err = Error::from(qrcode::types::QrError::DataTooLong);
        assert!(matches!(err, Error::QrEncode(_)));
    }
}
