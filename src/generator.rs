//! Prompt-free generation pipeline: validate, encode, caption, save.

use crate::caption::{Caption, CaptionFont, CaptionStyle, add_caption};
use crate::config::{DEFAULT_OUTPUT_PATH, QrcaptionConfig};
use crate::error::{Error, Result};
use crate::qr::{EcLevel, QrDecoder, QrEncoder, QrPayload, ec_level_name};
use image::{GenericImageView, ImageFormat, RgbImage, SubImage};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Text encoded into the QR code
    pub text: String,
    /// Caption drawn beneath the code
    pub caption: Caption,
    /// Destination PNG path
    pub output: PathBuf,
}

impl GenerateRequest {
    /// Request with the caption mirroring `text` and the default output path.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            caption: Caption::FromText,
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }

    /// Replace the caption.
    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.caption = caption;
        self
    }

    /// Replace the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// A composed QR image held in memory
#[derive(Debug, Clone)]
pub struct LabeledQr {
    /// Encoded payload
    pub payload: QrPayload,
    /// Caption drawn, if any
    pub caption: Option<String>,
    /// QR code plus caption band
    pub image: RgbImage,
    /// Height of the QR area; rows below it belong to the caption band
    pub qr_height: u32,
    /// Symbol version
    pub version: i16,
    /// Modules per side
    pub modules: usize,
    /// Error correction level used
    pub ecc_level: EcLevel,
}

impl LabeledQr {
    /// Write the image as PNG, replacing any existing file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        tracing::info!(path = %path.display(), "Saved captioned QR code");
        Ok(())
    }

    /// Decode the composed image and confirm it carries the original text.
    pub fn verify(&self) -> Result<()> {
        let decoded = QrDecoder::new().decode_rgb(&self.image)?;
        if decoded.as_bytes() == self.payload.as_bytes() {
            return Ok(());
        }

        Err(Error::RoundTripMismatch {
            expected: String::from_utf8_lossy(self.payload.as_bytes()).into_owned(),
            decoded: String::from_utf8_lossy(decoded.as_bytes()).into_owned(),
        })
    }

    /// The caption band, or `None` when no caption was drawn.
    pub fn caption_band(&self) -> Option<SubImage<&RgbImage>> {
        let (width, height) = self.image.dimensions();
        if self.caption.is_none() || height <= self.qr_height {
            return None;
        }
        Some(self.image.view(0, self.qr_height, width, height - self.qr_height))
    }

    /// Summary of this image as written to `output`.
    pub fn report(&self, output: &Path) -> GenerationReport {
        GenerationReport {
            output: output.to_path_buf(),
            width: self.image.width(),
            height: self.image.height(),
            version: self.version,
            ecc: ec_level_name(self.ecc_level).to_string(),
            modules: self.modules,
            caption: self.caption.clone(),
            payload_bytes: self.payload.len(),
        }
    }
}

/// What a successful generation produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// File written
    pub output: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// QR symbol version
    pub version: i16,
    /// Error correction level name
    pub ecc: String,
    /// Modules per side
    pub modules: usize,
    /// Caption drawn, if any
    pub caption: Option<String>,
    /// Encoded payload size
    pub payload_bytes: usize,
}

/// Encodes text, adds the caption band and writes PNG files
#[derive(Debug)]
pub struct Generator {
    encoder: QrEncoder,
    style: CaptionStyle,
    font: CaptionFont,
}

impl Generator {
    /// Create a generator, resolving the caption font up front.
    pub fn new(encoder: QrEncoder, style: CaptionStyle) -> Result<Self> {
        style.validate()?;
        let font = CaptionFont::resolve(&style.font, style.font_size)?;
        Ok(Self {
            encoder,
            style,
            font,
        })
    }

    /// Create a generator from loaded configuration.
    pub fn from_config(config: &QrcaptionConfig) -> Result<Self> {
        Self::new(config.encoder()?, config.caption_style()?)
    }

    /// Caption style in use
    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Encode and caption in memory without touching the filesystem.
    pub fn render(&self, request: &GenerateRequest) -> Result<LabeledQr> {
        if request.text.trim().is_empty() {
            return Err(Error::InvalidInput("text must not be empty".to_string()));
        }

        let payload = QrPayload::from_string(request.text.clone());
        let encoded = self.encoder.encode(&payload)?;
        let qr_height = encoded.image.height();

        let caption = request.caption.resolve(&request.text).map(str::to_string);
        let image = match caption.as_deref() {
            Some(text) => add_caption(&encoded.image, text, &self.font, &self.style)?,
            None => encoded.image,
        };

        Ok(LabeledQr {
            payload,
            caption,
            image,
            qr_height,
            version: encoded.version,
            modules: encoded.modules,
            ecc_level: encoded.ecc_level,
        })
    }

    /// Render and write the PNG to `request.output`.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerationReport> {
        let labeled = self.render(request)?;
        labeled.save(&request.output)?;
        Ok(labeled.report(&request.output))
    }
}
