use clap::{Parser, Subcommand};
use qr_ladder::{
    DecodeError, DecodeOptions, DecodeOrchestrator, DecodeResult, LuminanceMatrix, RxingDecoder,
    Transform, histogram, load_path, otsu_threshold,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrladder", version, about = "Recover QR codes from impaired images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the preprocessing ladder and print the decoded text
    Decode {
        #[arg(long)]
        image: PathBuf,
        /// Evaluate ladder stages in parallel
        #[arg(long)]
        parallel: bool,
        /// Abandon the decode after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
        /// Disable rxing's TryHarder hint
        #[arg(long)]
        no_try_harder: bool,
    },
    /// Write every ladder stage of an image as PNG
    Stages {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print luminance stats and the Otsu threshold
    Otsu {
        #[arg(long)]
        image: PathBuf,
    },
}

const EXIT_NOT_FOUND: u8 = 1;
const EXIT_LOAD: u8 = 2;
const EXIT_PROCESSING: u8 = 3;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Decode {
            image,
            parallel,
            timeout_ms,
            json,
            no_try_harder,
        } => {
            let decoder = RxingDecoder::new().with_try_harder(!no_try_harder);
            decode_cmd(&image, decoder, parallel, timeout_ms, json)
        }
        Command::Stages { image, out } => stages_cmd(&image, &out),
        Command::Otsu { image } => otsu_cmd(&image),
    }
}

fn decode_cmd(
    image: &Path,
    decoder: RxingDecoder,
    parallel: bool,
    timeout_ms: Option<u64>,
    json: bool,
) -> ExitCode {
    let mut options = DecodeOptions::from_env();
    if parallel {
        options.schedule = qr_ladder::Schedule::Parallel;
    }
    if let Some(ms) = timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }

    let start = Instant::now();
    let outcome = load_path(image)
        .map_err(DecodeError::from)
        .and_then(|raw| DecodeOrchestrator::with_options(decoder, options).decode(&raw));
    let elapsed = start.elapsed();

    let (report, code) = match &outcome {
        Ok(result) if result.success => (result.clone(), ExitCode::SUCCESS),
        Ok(result) => (result.clone(), ExitCode::from(EXIT_NOT_FOUND)),
        Err(err @ DecodeError::Load(_)) => {
            (DecodeResult::from_error(err), ExitCode::from(EXIT_LOAD))
        }
        Err(err) => (DecodeResult::from_error(err), ExitCode::from(EXIT_PROCESSING)),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(err) => eprintln!("Failed to serialize result: {}", err),
        }
        return code;
    }

    match outcome {
        Ok(result) => match (&result.text, result.winning_attempt()) {
            (Some(text), Some(winner)) => {
                println!("{}", text);
                eprintln!(
                    "decoded at {}/{} after {} attempts ({:.2?})",
                    winner.stage,
                    winner.binarizer,
                    result.attempts.len(),
                    elapsed
                );
            }
            _ => eprintln!(
                "No QR code found in {} ({} attempts, {:.2?})",
                image.display(),
                result.attempts.len(),
                elapsed
            ),
        },
        Err(err) => eprintln!("Failed to decode {}: {}", image.display(), err),
    }
    code
}

fn stages_cmd(image: &Path, out: &Path) -> ExitCode {
    let raw = match load_path(image) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::from(EXIT_LOAD);
        }
    };
    if let Err(err) = std::fs::create_dir_all(out) {
        eprintln!("Failed to create {}: {}", out.display(), err);
        return ExitCode::FAILURE;
    }

    for stage in Transform::LADDER {
        let processed = stage.apply(&raw);
        let path = out.join(format!("{:02}-{}.png", stage.priority(), stage.name()));
        match processed.save_png(&path) {
            Ok(()) => println!(
                "{} -> {} ({}x{})",
                stage,
                path.display(),
                processed.width(),
                processed.height()
            ),
            Err(err) => {
                eprintln!("Failed to write {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn otsu_cmd(image: &Path) -> ExitCode {
    let raw = match load_path(image) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::from(EXIT_LOAD);
        }
    };

    let luminance = LuminanceMatrix::from_image(&raw);
    let (min, max, avg) = luminance.stats();
    let threshold = otsu_threshold(&histogram(luminance.as_bytes()));
    println!("Image: {} ({}x{})", image.display(), raw.width(), raw.height());
    println!("Luminance range: {}-{}, average: {}", min, max, avg);
    println!("Otsu threshold: {}", threshold);
    ExitCode::SUCCESS
}
