//! Caption font resolution
//!
//! Captions are drawn with a TrueType font when one can be found and with the
//! built-in 8x8 bitmap font otherwise, so rendering never depends on the host
//! having fonts installed.

use crate::error::{Error, Result};
use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Well-known TrueType locations tried by [`FontSource::Auto`], in order.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const GLYPH_CELL: u32 = 8;

/// Where the caption font comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontSource {
    /// First loadable system font, falling back to the bitmap font
    #[default]
    Auto,
    /// Always use the built-in bitmap font
    Builtin,
    /// A specific TrueType/OpenType file; failure to load it is an error
    File(PathBuf),
}

impl FromStr for FontSource {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Err(Error::Config("Font source must not be empty".to_string())),
            "auto" => Ok(Self::Auto),
            "builtin" | "bitmap" => Ok(Self::Builtin),
            _ => Ok(Self::File(PathBuf::from(trimmed))),
        }
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Builtin => f.write_str("builtin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A font ready to measure and draw caption text
pub enum CaptionFont {
    /// Outline font rasterised through ab_glyph
    TrueType {
        /// Parsed font data
        font: FontVec,
        /// Pixel scale
        scale: PxScale,
    },
    /// Built-in 8x8 bitmap glyphs, each pixel blown up to `scale` x `scale`
    Bitmap {
        /// Integer magnification of the 8px cell
        scale: u32,
    },
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("scale", &scale.y)
                .finish_non_exhaustive(),
            Self::Bitmap { scale } => f.debug_struct("Bitmap").field("scale", scale).finish(),
        }
    }
}

impl CaptionFont {
    /// Resolve a font source at the given pixel size.
    pub fn resolve(source: &FontSource, size: f32) -> Result<Self> {
        match source {
            FontSource::Builtin => Ok(Self::builtin(size)),
            FontSource::File(path) => Self::load(path, size),
            FontSource::Auto => {
                for candidate in SYSTEM_FONT_PATHS {
                    let path = Path::new(candidate);
                    if !path.exists() {
                        continue;
                    }
                    match Self::load(path, size) {
                        Ok(font) => {
                            tracing::debug!("Using caption font {}", path.display());
                            return Ok(font);
                        }
                        Err(err) => tracing::debug!("Skipping font {}: {err}", path.display()),
                    }
                }
                tracing::debug!("No system font found, using built-in bitmap font");
                Ok(Self::builtin(size))
            }
        }
    }

    /// Load a TrueType/OpenType font file.
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Font(format!("Failed to read {}: {e}", path.display())))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| Error::Font(format!("Invalid font {}: {e}", path.display())))?;

        Ok(Self::TrueType {
            font,
            scale: PxScale::from(size),
        })
    }

    /// The built-in bitmap font, magnified to approximate `size` pixels.
    pub fn builtin(size: f32) -> Self {
        let max_scale = super::MAX_FONT_SIZE / GLYPH_CELL as f32;
        let scale = (size / GLYPH_CELL as f32).round().max(1.0).min(max_scale) as u32;
        Self::Bitmap { scale }
    }

    /// True for the bitmap fallback.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Bitmap { .. })
    }

    /// Width and height in pixels of `text` when drawn with this font.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            Self::TrueType { font, scale } => imageproc::drawing::text_size(*scale, font, text),
            Self::Bitmap { scale } => {
                let cell = GLYPH_CELL.saturating_mul(*scale);
                let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                (chars.saturating_mul(cell), cell)
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Pixels outside the canvas are clipped.
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        match self {
            Self::TrueType { font, scale } => {
                imageproc::drawing::draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            Self::Bitmap { scale } => draw_bitmap_text(canvas, color, x, y, *scale, text),
        }
    }
}

fn glyph_rows(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, scale: u32, text: &str) {
    let scale = scale as i64;
    let cell = GLYPH_CELL as i64 * scale;
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x as i64 + index as i64 * cell;
        for (row, bits) in glyph_rows(ch).iter().enumerate() {
            for col in 0..GLYPH_CELL {
                // Bit 0 is the leftmost pixel
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col as i64 * scale;
                let py = y as i64 + row as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (cx, cy) = (px + dx, py + dy);
                        if (0..width).contains(&cx) && (0..height).contains(&cy) {
                            canvas.put_pixel(cx as u32, cy as u32, color);
                        }
                    }
                }
            }
        }
    }
}
