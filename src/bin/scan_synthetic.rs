use clap::{Parser, ValueEnum};
use rust_scan::session::{FrameSampler, ScanSession};
use rust_scan::tools::synthetic::{
    barcode_frame, blank_frame, line_segments_frame, noise_frame, text_frame,
};
use rust_scan::{CapabilitySet, OwnedFrame, ScanConfig, ScanEngine, detect_capabilities};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Scene {
    Barcode,
    Blank,
    Noise,
    Text,
    Lines,
}

#[derive(Parser)]
#[command(name = "scan_synthetic", version, about = "Scan synthetic frames")]
struct Cli {
    #[arg(long, value_enum, default_value = "barcode")]
    scene: Scene,
    /// Seed for random scenes
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Frames to stream through a scan session
    #[arg(long, default_value_t = 30)]
    frames: usize,
    /// Scan every N-th frame
    #[arg(long, default_value_t = 5)]
    every: u64,
    /// Use only the heuristic path
    #[arg(long)]
    heuristic_only: bool,
}

fn render(scene: Scene, seed: u64) -> OwnedFrame {
    match scene {
        Scene::Barcode => barcode_frame(),
        Scene::Blank => blank_frame(320, 240, 255),
        Scene::Noise => noise_frame(320, 240, seed),
        Scene::Text => text_frame("TRACE SALE", 320, 240, 3),
        Scene::Lines => line_segments_frame(320, 240, 6, seed),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let capabilities = if cli.heuristic_only {
        CapabilitySet {
            library_decoder_available: false,
            image_toolkit_available: true,
        }
    } else {
        detect_capabilities()
    };
    let engine = ScanEngine::with_capabilities(ScanConfig::from_env(), capabilities);
    println!("Capabilities: {}", engine.capabilities().summary());

    let frame = render(cli.scene, cli.seed);
    let start = Instant::now();
    match engine.scan_once(&frame.as_frame()) {
        Some(candidate) => println!(
            "Single scan: {} (source={}, variant={}) in {:.1}ms",
            candidate.payload,
            candidate.source,
            candidate.variant,
            start.elapsed().as_secs_f64() * 1000.0
        ),
        None => println!(
            "Single scan: no code in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        ),
    }

    let frames = std::iter::repeat_n(frame, cli.frames);
    let session = ScanSession::spawn(engine, frames, FrameSampler::new(cli.every));
    while let Some(candidate) = session.recv() {
        println!("Session detection: {}", candidate.payload);
    }
    if let Some((_, summary)) = session.join() {
        println!(
            "Session: {} frames, {} scanned, {} reported",
            summary.frames_seen, summary.frames_scanned, summary.detections
        );
    }
}
