//! qrcaption - QR code PNGs with a human-readable caption underneath
//!
//! Text is encoded with the `qrcode` crate, rendered to an RGB bitmap, extended
//! downward with a caption band and written as PNG.
//!
//! # Features
//!
//! - **Captioning**: TrueType captions via `ab_glyph`, with a built-in bitmap
//!   font when no system font is available
//! - **Verification**: composed images can be decoded again with `rqrr`
//! - **Configuration**: toml/yaml files plus `QRCAPTION_*` environment overrides
//!
//! # Example
//!
//! ```no_run
//! use qrcaption::{Caption, GenerateRequest, Generator, QrcaptionConfig};
//!
//! fn main() -> qrcaption::Result<()> {
//!     let generator = Generator::from_config(&QrcaptionConfig::default())?;
//!
//!     let request = GenerateRequest::new("https://example.com")
//!         .with_caption(Caption::Text("Example".to_string()))
//!         .with_output("example.png");
//!     let report = generator.generate(&request)?;
//!
//!     println!("Wrote {}x{} image", report.width, report.height);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod caption;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod prompt;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use caption::{Caption, CaptionFont, CaptionStyle, FontSource};
pub use config::{LogRotation, LoggingOptions, QrcaptionConfig};
pub use generator::{GenerateRequest, GenerationReport, Generator, LabeledQr};
pub use prompt::{PromptOutcome, Prompter};
pub use qr::{QrDecoder, QrEncoder, QrPayload};

/// Encode `text`, caption it with itself and write `qr_output.png`.
///
/// Uses default rendering options and does not read configuration files.
pub fn generate(text: &str) -> Result<GenerationReport> {
    Generator::from_config(&QrcaptionConfig::default())?.generate(&GenerateRequest::new(text))
}
