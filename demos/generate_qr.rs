//! Generate captioned QR codes and save them to files
//!
//! Usage: cargo run --example generate_qr

use qrcaption::{Caption, CaptionStyle, FontSource, GenerateRequest, Generator, QrEncoder};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let generator = Generator::new(QrEncoder::new(), CaptionStyle::default())?;

    // Caption mirrors the encoded text
    let report = generator.generate(&GenerateRequest::new("Hello from qrcaption!"))?;
    println!("✓ QR code generated and saved to {}", report.output.display());

    // Custom caption, high error correction, built-in bitmap font
    let bitmap = Generator::new(
        QrEncoder::with_ecc_level(qrcaption::qr::EcLevel::H).module_size(8),
        CaptionStyle {
            font: FontSource::Builtin,
            ..CaptionStyle::default()
        },
    )?;
    let url = "https://www.rust-lang.org";
    let labeled = bitmap.render(
        &GenerateRequest::new(url)
            .with_caption(Caption::Text("rust-lang.org".to_string())),
    )?;
    labeled.save(Path::new("qr_rust_lang.png"))?;
    labeled.verify()?;

    println!("✓ Captioned QR code generated and saved to qr_rust_lang.png");
    println!("  Content: {}", url);

    Ok(())
}
