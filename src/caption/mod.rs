//! Caption compositing
//!
//! Extends a rendered QR bitmap downward and draws a centred line of text in
//! the new band.

mod font;

pub use font::{CaptionFont, FontSource, SYSTEM_FONT_PATHS};

use crate::error::{Error, Result};
use image::{Rgb, RgbImage, imageops};

/// Default caption font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
/// Default padding around the caption in pixels
pub const DEFAULT_PADDING: u32 = 10;
/// Largest accepted caption font size in pixels
pub const MAX_FONT_SIZE: f32 = 512.0;
/// Largest accepted caption padding in pixels
pub const MAX_PADDING: u32 = 4096;
/// Largest composed canvas side in pixels
pub const MAX_CANVAS_SIDE: u32 = 32_768;

/// What to write under the QR code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caption {
    /// Reuse the encoded text
    #[default]
    FromText,
    /// Custom caption text
    Text(String),
    /// No caption band
    Hidden,
}

impl Caption {
    /// Resolve against the encoded text. `None` means no band is drawn.
    pub fn resolve<'a>(&'a self, text: &'a str) -> Option<&'a str> {
        let caption = match self {
            Self::FromText => text,
            Self::Text(custom) => custom.as_str(),
            Self::Hidden => return None,
        };
        let caption = caption.trim();
        (!caption.is_empty()).then_some(caption)
    }
}

/// Visual parameters of the caption band
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    /// Font to draw with
    pub font: FontSource,
    /// Font size in pixels
    pub font_size: f32,
    /// Space above, below and beside the text
    pub padding: u32,
    /// Text colour
    pub color: Rgb<u8>,
    /// Band (and widened canvas) fill colour
    pub background: Rgb<u8>,
}

impl CaptionStyle {
    /// Reject sizes that cannot produce a sensible canvas.
    pub fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 || self.font_size > MAX_FONT_SIZE {
            return Err(Error::Config(format!(
                "Invalid font size '{}', expected 1..={MAX_FONT_SIZE}",
                self.font_size
            )));
        }
        if self.padding > MAX_PADDING {
            return Err(Error::Config(format!(
                "Invalid caption padding '{}', expected at most {MAX_PADDING}",
                self.padding
            )));
        }
        Ok(())
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: FontSource::Auto,
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_PADDING,
            color: Rgb([0, 0, 0]),
            background: Rgb([255, 255, 255]),
        }
    }
}

/// Place `caption` beneath `qr`, returning the composed image.
///
/// The canvas is widened when the text is wider than the QR code, and the QR
/// code stays horizontally centred at the top. Fails with [`Error::Image`]
/// when the composed canvas would exceed [`MAX_CANVAS_SIDE`].
pub fn add_caption(
    qr: &RgbImage,
    caption: &str,
    font: &CaptionFont,
    style: &CaptionStyle,
) -> Result<RgbImage> {
    if caption.is_empty() {
        return Ok(qr.clone());
    }

    let (text_w, text_h) = font.measure(caption);
    let (qr_w, qr_h) = qr.dimensions();
    let pad = style.padding;

    let band = pad.checked_mul(2);
    let width = band
        .and_then(|b| text_w.checked_add(b))
        .map(|w| w.max(qr_w))
        .filter(|&w| w <= MAX_CANVAS_SIDE);
    let height = band
        .and_then(|b| text_h.checked_add(b))
        .and_then(|h| h.checked_add(qr_h))
        .filter(|&h| h <= MAX_CANVAS_SIDE);
    let (Some(width), Some(height)) = (width, height) else {
        return Err(Error::Image(format!(
            "caption canvas too large: text {text_w}x{text_h}px, padding {pad}px, limit {MAX_CANVAS_SIDE}px"
        )));
    };

    let mut out = RgbImage::from_pixel(width, height, style.background);
    let qr_x = (width - qr_w) / 2;
    imageops::replace(&mut out, qr, qr_x as i64, 0);

    let text_x = (width - text_w) / 2;
    let text_y = qr_h + pad;
    font.draw(&mut out, style.color, text_x as i32, text_y as i32, caption);

    tracing::debug!(
        text_width = text_w,
        text_height = text_h,
        width,
        height,
        builtin_font = font.is_builtin(),
        "Composed caption"
    );

    Ok(out)
}
