//! qrcaption runtime configuration handling

use crate::caption::{CaptionStyle, DEFAULT_FONT_SIZE, DEFAULT_PADDING, FontSource};
use crate::error::{Error, Result};
use crate::qr::{DEFAULT_MODULE_SIZE, EcLevel, MAX_MODULE_SIZE, QrEncoder, parse_ec_level};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Smaller configured font sizes are rounded up to this
const MIN_FONT_SIZE: f32 = 6.0;

/// Output path used when the caller does not name one
pub const DEFAULT_OUTPUT_PATH: &str = "qr_output.png";

/// Top-level configuration structure loaded from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrcaptionConfig {
    /// QR rendering options
    pub render: RenderConfig,
    /// Caption band options
    pub caption: CaptionConfig,
    /// Output file options
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl QrcaptionConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    ///
    /// Runs before logging is installed, so the chosen file is recorded in
    /// `source` for the caller to report.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let source = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };
        let mut config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.source = source;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrcaption.toml", "qrcaption.yaml", "qrcaption.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrcaption");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.render.apply_env_overrides();
        self.caption.apply_env_overrides();
        self.output.apply_env_overrides();
        self.logging.apply_env_overrides();
    }

    /// Build the QR encoder described by `render`.
    pub fn encoder(&self) -> Result<QrEncoder> {
        self.render.to_encoder()
    }

    /// Build the caption style described by `caption`.
    pub fn caption_style(&self) -> Result<CaptionStyle> {
        self.caption.to_style()
    }
}

/// QR symbol rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Error correction level (`L`, `M`, `Q`, `H`)
    pub ecc: String,
    /// Pixels per module
    pub module_size: u32,
    /// Draw the 4-module light border
    pub quiet_zone: bool,
    /// Dark module colour
    pub foreground: String,
    /// Light module colour
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ecc: "M".to_string(),
            module_size: DEFAULT_MODULE_SIZE,
            quiet_zone: true,
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

impl RenderConfig {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(ecc) = env::var("QRCAPTION_ECC") {
            self.ecc = ecc;
        }
        if let Ok(size) = env::var("QRCAPTION_MODULE_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.module_size = parsed.max(1);
            }
        }
        if let Ok(color) = env::var("QRCAPTION_FOREGROUND") {
            self.foreground = color;
        }
        if let Ok(color) = env::var("QRCAPTION_BACKGROUND") {
            self.background = color;
        }
    }

    /// Parsed error correction level.
    pub fn ec_level(&self) -> Result<EcLevel> {
        parse_ec_level(&self.ecc).ok_or_else(|| {
            Error::Config(format!(
                "Unknown error correction level '{}'. Use L, M, Q, or H",
                self.ecc
            ))
        })
    }

    /// Merge these options into a ready-to-use encoder.
    pub fn to_encoder(&self) -> Result<QrEncoder> {
        if self.module_size > MAX_MODULE_SIZE {
            return Err(Error::Config(format!(
                "Invalid module size '{}', expected at most {MAX_MODULE_SIZE}",
                self.module_size
            )));
        }
        Ok(QrEncoder::with_ecc_level(self.ec_level()?)
            .module_size(self.module_size)
            .quiet_zone(self.quiet_zone)
            .colors(parse_color(&self.foreground)?, parse_color(&self.background)?))
    }
}

/// Caption band options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// `auto`, `builtin`, or a path to a TrueType font
    pub font: String,
    /// Font size in pixels
    pub font_size: f32,
    /// Padding around the caption in pixels
    pub padding: u32,
    /// Caption text colour
    pub color: String,
    /// Caption band colour
    pub background: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font: "auto".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_PADDING,
            color: "#000000".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

impl CaptionConfig {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(font) = env::var("QRCAPTION_FONT") {
            self.font = font;
        }
        if let Ok(size) = env::var("QRCAPTION_FONT_SIZE") {
            if let Ok(parsed) = size.parse::<f32>() {
                self.font_size = parsed;
            }
        }
        if let Ok(padding) = env::var("QRCAPTION_CAPTION_PADDING") {
            if let Ok(parsed) = padding.parse::<u32>() {
                self.padding = parsed;
            }
        }
        if let Ok(color) = env::var("QRCAPTION_CAPTION_COLOR") {
            self.color = color;
        }
    }

    /// Merge these options into a caption style.
    pub fn to_style(&self) -> Result<CaptionStyle> {
        let mut style = CaptionStyle {
            font: self.font.parse::<FontSource>()?,
            font_size: self.font_size,
            padding: self.padding,
            color: parse_color(&self.color)?,
            background: parse_color(&self.background)?,
        };
        style.validate()?;
        style.font_size = style.font_size.max(MIN_FONT_SIZE);
        Ok(style)
    }
}

/// Output file options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path written when the caller does not provide one
    pub default_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl OutputConfig {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("QRCAPTION_OUTPUT") {
            if !path.trim().is_empty() {
                self.default_path = PathBuf::from(path);
            }
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRCAPTION_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in terminal logging
    pub color: bool,
    /// Rotation strategy applied to `file`
    pub rotation: LogRotation,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: LogRotation::Never,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRCAPTION_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRCAPTION_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRCAPTION_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("QRCAPTION_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = parsed;
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Append to a single file
    #[default]
    Never,
    /// Start a new file each day
    Daily,
}

impl LogRotation {
    /// Parse a rotation name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "never" | "none" => Some(Self::Never),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb`, `black` or `white` into an RGB colour.
pub fn parse_color(value: &str) -> Result<Rgb<u8>> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "black" => return Ok(Rgb([0, 0, 0])),
        "white" => return Ok(Rgb([255, 255, 255])),
        _ => {}
    }

    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => {
            return Err(Error::Config(format!(
                "Invalid colour '{value}', expected #rrggbb"
            )));
        }
    };

    let bytes = hex::decode(&expanded)
        .map_err(|e| Error::Config(format!("Invalid colour '{value}': {e}")))?;
    Ok(Rgb([bytes[0], bytes[1], bytes[2]]))
}
