//! qrcaption command-line entrypoint

use clap::Parser;
use qrcaption::qr::parse_ec_level;
use qrcaption::{
    Caption, Error, FontSource, GenerateRequest, Generator, PromptOutcome, Prompter,
    QrcaptionConfig, Result, logging,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "qrcaption",
    version,
    about = "Generate a QR code PNG with a caption underneath"
)]
struct Cli {
    /// Text or URL to encode. Prompts interactively when omitted.
    #[arg(long, short)]
    text: Option<String>,

    /// Caption drawn below the code (defaults to the encoded text)
    #[arg(long, short, conflicts_with = "no_caption")]
    caption: Option<String>,

    /// Do not draw a caption
    #[arg(long)]
    no_caption: bool,

    /// Output PNG path (defaults to qr_output.png or the configured path)
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Optional configuration file (toml/yaml). Defaults to qrcaption.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Error correction level (L, M, Q, H)
    #[arg(long, value_name = "LEVEL")]
    ecc: Option<String>,

    /// Pixels per QR module
    #[arg(long, value_name = "PX")]
    module_size: Option<u32>,

    /// Caption font: `auto`, `builtin`, or a path to a TrueType font
    #[arg(long, value_name = "FONT")]
    font: Option<String>,

    /// Caption font size in pixels
    #[arg(long, value_name = "PX")]
    font_size: Option<f32>,

    /// Decode the written image and check it matches the input text
    #[arg(long)]
    verify: bool,

    /// Print a JSON report instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = QrcaptionConfig::load(cli.config.as_deref())?;

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    if let Some(ref ecc) = cli.ecc {
        if parse_ec_level(ecc).is_none() {
            return Err(Error::Config(format!(
                "Unknown error correction level '{ecc}'. Use L, M, Q, or H"
            )));
        }
        config.render.ecc = ecc.clone();
    }

    if let Some(size) = cli.module_size {
        config.render.module_size = size.max(1);
    }

    if let Some(ref font) = cli.font {
        // Validate early so a bad value fails before prompting
        font.parse::<FontSource>()?;
        config.caption.font = font.clone();
    }

    if let Some(size) = cli.font_size {
        config.caption.font_size = size;
    }

    logging::init(&config.logging)?;

    match &config.source {
        Some(path) => info!("Using configuration file: {}", path.display()),
        None => debug!("No qrcaption.toml / qrcaption.yaml found, using defaults"),
    }

    let request = match cli.text {
        Some(text) => {
            let caption = if cli.no_caption {
                Caption::Hidden
            } else {
                cli.caption.map(Caption::Text).unwrap_or_default()
            };
            GenerateRequest::new(text)
                .with_caption(caption)
                .with_output(
                    cli.output
                        .clone()
                        .unwrap_or_else(|| config.output.default_path.clone()),
                )
        }
        None => {
            if !cli.json {
                println!("qrcaption - QR code with a caption");
            }
            let default_output = cli
                .output
                .clone()
                .unwrap_or_else(|| config.output.default_path.clone());
            let stdin = io::stdin();
            match Prompter::new(stdin.lock(), io::stdout()).run(&default_output)? {
                PromptOutcome::Request(request) => request,
                PromptOutcome::Cancelled => {
                    println!("\nCancelled.");
                    return Ok(());
                }
            }
        }
    };

    let generator = Generator::from_config(&config)?;
    info!(output = %request.output.display(), "Generating QR code");

    let labeled = generator.render(&request)?;
    labeled.save(&request.output)?;

    if cli.verify {
        labeled.verify()?;
        info!("Round trip verified");
    }

    let report = labeled.report(&request.output);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Saved to: {}", report.output.display());
        if cli.verify {
            println!("Verified: decoded text matches input");
        }
    }

    Ok(())
}
