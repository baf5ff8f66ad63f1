use clap::{Parser, ValueEnum};
use rust_scan::tools::{image_paths, scan_image_file};
use rust_scan::{ScanConfig, ScanEngine, ScanMode};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Barcode,
    Qr,
}

#[derive(Parser)]
#[command(name = "scan_image", version, about = "Scan still images for product codes")]
struct Cli {
    /// Image files or directories of images
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Code family to tune for (defaults to SCAN_MODE or barcode)
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Skip the certified decoder backend
    #[arg(long)]
    no_library: bool,
    /// Skip preprocessing and heuristic decoding
    #[arg(long)]
    no_toolkit: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ScanConfig::from_env();
    match cli.mode {
        Some(Mode::Qr) => config.mode = ScanMode::Qr,
        Some(Mode::Barcode) => config.mode = ScanMode::Barcode,
        None => {}
    }
    config.allow_library &= !cli.no_library;
    config.allow_toolkit &= !cli.no_toolkit;

    let engine = ScanEngine::new(config);
    let status = engine.status();
    println!(
        "Scanner: mode={:?} methods={:?} recommended={:?}",
        status.mode, status.methods, status.recommended
    );

    let mut found = 0usize;
    let mut failed = 0usize;
    let paths = image_paths(&cli.paths);
    for path in &paths {
        let start = Instant::now();
        match scan_image_file(&engine, path) {
            Ok(Some(candidate)) => {
                found += 1;
                println!(
                    "{}: {} (source={}, variant={}, {:.1}ms)",
                    path.display(),
                    candidate.payload,
                    candidate.source,
                    candidate.variant,
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            Ok(None) => println!("{}: no code", path.display()),
            Err(err) => {
                failed += 1;
                eprintln!("{}: {}", path.display(), err);
            }
        }
    }

    println!(
        "Scanned {} images: {} with codes, {} unreadable",
        paths.len(),
        found,
        failed
    );
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
