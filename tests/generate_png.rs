use image::{GenericImageView, ImageFormat, Rgb};
use tempfile::TempDir;

use qrcaption::{
    Caption, CaptionFont, CaptionStyle, Error, FontSource, GenerateRequest, Generator, QrDecoder,
    QrEncoder, QrcaptionConfig,
};

// Byte-mode capacity of a version 40 symbol at error correction level M
const BYTE_CAPACITY_M: usize = 2331;

fn bundled_font() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fonts/DejaVuSans.ttf")
}

fn builtin_generator() -> Generator {
    let style = CaptionStyle {
        font: FontSource::Builtin,
        ..CaptionStyle::default()
    };
    Generator::new(QrEncoder::new(), style).expect("builtin generator")
}

fn decode_file(path: &std::path::Path) -> String {
    let img = image::open(path).expect("open written png");
    let payload = QrDecoder::new().decode(&img).expect("decode written png");
    payload.as_str().expect("utf-8 payload").to_string()
}

#[test]
fn written_png_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let generator = builtin_generator();

    for (i, text) in [
        "hello",
        "https://github.com/example/project?tab=readme",
        "Mixed CASE with symbols !@#$%^&*()",
        "0123456789",
    ]
    .into_iter()
    .enumerate()
    {
        let path = dir.path().join(format!("qr_{i}.png"));
        generator
            .generate(&GenerateRequest::new(text).with_output(&path))
            .expect("generate");
        assert_eq!(decode_file(&path), text);
    }
}

#[test]
fn output_is_valid_png() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("out.png");

    let report = builtin_generator()
        .generate(&GenerateRequest::new("png check").with_output(&path))
        .expect("generate");

    let bytes = std::fs::read(&path).expect("read output");
    assert_eq!(
        image::guess_format(&bytes).expect("guess format"),
        ImageFormat::Png
    );
    let img = image::load_from_memory(&bytes).expect("load png");
    assert_eq!(img.dimensions(), (report.width, report.height));
    assert_eq!(report.output, path);
}

#[test]
fn caption_band_contains_text_pixels() {
    let generator = builtin_generator();
    let labeled = generator
        .render(&GenerateRequest::new("https://example.com").with_caption(Caption::Text(
            "Example".to_string(),
        )))
        .expect("render");

    let band = labeled.caption_band().expect("caption band");
    let background = generator.style().background;
    let ink = band
        .pixels()
        .filter(|(_, _, pixel)| *pixel != background)
        .count();
    assert!(ink > 0, "caption band is blank");
}

#[test]
fn caption_survives_png_encoding() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("caption.png");
    let generator = builtin_generator();
    let request = GenerateRequest::new("caption on disk").with_output(&path);

    let labeled = generator.render(&request).expect("render");
    labeled.save(&path).expect("save");

    let written = image::open(&path).expect("open").to_rgb8();
    let dark_below_qr = (labeled.qr_height..written.height())
        .flat_map(|y| (0..written.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| *written.get_pixel(x, y) == Rgb([0, 0, 0]))
        .count();
    assert!(dark_below_qr > 0);
}

#[test]
fn second_write_replaces_first() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("same.png");
    let generator = builtin_generator();

    let first = generator
        .generate(
            &GenerateRequest::new("first payload, a little longer than the second")
                .with_output(&path),
        )
        .expect("first");
    let second = generator
        .generate(&GenerateRequest::new("second").with_output(&path))
        .expect("second");

    assert_ne!(first.width, second.width);
    assert_eq!(decode_file(&path), "second");
    let img = image::open(&path).expect("open");
    assert_eq!(img.dimensions(), (second.width, second.height));
}

#[test]
fn empty_text_is_invalid_input() {
    let err = qrcaption::generate("").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
}

#[test]
fn oversized_text_is_encoding_error() {
    let text = "x".repeat(BYTE_CAPACITY_M * 2);
    let err = qrcaption::generate(&text).unwrap_err();
    assert!(matches!(err, Error::QrEncode(_)), "got {err:?}");
}

#[test]
fn full_capacity_round_trips_and_one_more_byte_fails() {
    let generator = builtin_generator();

    let largest = "x".repeat(BYTE_CAPACITY_M);
    let labeled = generator
        .render(&GenerateRequest::new(largest.as_str()).with_caption(Caption::Text(
            "capacity".to_string(),
        )))
        .expect("render at capacity");
    assert_eq!(labeled.version, 40);
    assert_eq!(labeled.modules, 177);
    labeled.verify().expect("round trip at capacity");

    let too_long = "x".repeat(BYTE_CAPACITY_M + 1);
    let err = generator
        .render(&GenerateRequest::new(too_long))
        .unwrap_err();
    assert!(matches!(err, Error::QrEncode(_)), "got {err:?}");
}

#[test]
fn truetype_font_file_draws_caption() {
    let path = bundled_font();
    let font = CaptionFont::resolve(&FontSource::File(path.clone()), 16.0).expect("load ttf");
    assert!(!font.is_builtin());
    let (width, height) = font.measure("Example");
    assert!(width > 0 && height > 0);

    let style = CaptionStyle {
        font: FontSource::File(path),
        ..CaptionStyle::default()
    };
    let generator = Generator::new(QrEncoder::new(), style).expect("generator");
    let labeled = generator
        .render(&GenerateRequest::new("https://example.com").with_caption(Caption::Text(
            "Example".to_string(),
        )))
        .expect("render");

    let band = labeled.caption_band().expect("caption band");
    let background = generator.style().background;
    let ink = band
        .pixels()
        .filter(|(_, _, pixel)| *pixel != background)
        .count();
    assert!(ink > 0, "truetype caption band is blank");
    labeled.verify().expect("round trip");
}

#[test]
fn invalid_font_file_is_font_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("not-a-font.ttf");
    std::fs::write(&path, b"definitely not a font").expect("write");

    let style = CaptionStyle {
        font: FontSource::File(path),
        ..CaptionStyle::default()
    };
    let err = Generator::new(QrEncoder::new(), style).unwrap_err();
    assert!(matches!(err, Error::Font(_)), "got {err:?}");
}

#[test]
fn oversized_caption_settings_fail_cleanly() {
    let mut config = QrcaptionConfig::default();
    config.caption.font = "builtin".to_string();
    config.caption.font_size = 1e12;
    let err = Generator::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {err:?}");

    let mut config = QrcaptionConfig::default();
    config.caption.font = "builtin".to_string();
    config.caption.padding = u32::MAX / 2 + 1;
    let err = Generator::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {err:?}");
}

#[test]
fn missing_directory_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("does/not/exist/out.png");

    let err = builtin_generator()
        .generate(&GenerateRequest::new("io").with_output(&path))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
    assert!(!path.exists());
}

#[test]
fn configured_generator_verifies() {
    let mut config = QrcaptionConfig::default();
    config.render.ecc = "H".to_string();
    config.render.module_size = 6;
    config.caption.font = "builtin".to_string();
    config.caption.font_size = 24.0;

    let generator = Generator::from_config(&config).expect("generator");
    let labeled = generator
        .render(&GenerateRequest::new("configured"))
        .expect("render");

    labeled.verify().expect("round trip");
    assert_eq!(labeled.qr_height, (labeled.modules as u32 + 8) * 6);
    // 24px requested -> 3x magnified 8px cell
    assert_eq!(labeled.image.height(), labeled.qr_height + 24 + 20);
}

#[test]
fn system_font_fallback_still_renders() {
    let generator = Generator::new(QrEncoder::new(), CaptionStyle::default()).expect("generator");
    let labeled = generator
        .render(&GenerateRequest::new("auto font"))
        .expect("render");
    assert!(labeled.caption_band().is_some());
    labeled.verify().expect("round trip");
}
