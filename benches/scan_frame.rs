use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_scan::tools::synthetic::{barcode_frame, blank_frame, noise_frame};
use rust_scan::{CapabilitySet, ScanConfig, ScanEngine};

fn heuristic_engine() -> ScanEngine {
    ScanEngine::with_capabilities(
        ScanConfig::default(),
        CapabilitySet {
            library_decoder_available: false,
            image_toolkit_available: true,
        },
    )
}

fn bench_scan_barcode_heuristic(c: &mut Criterion) {
    let frame = barcode_frame();
    let engine = heuristic_engine();
    c.bench_function("scan_barcode_heuristic", |b| {
        b.iter(|| engine.scan_once(black_box(&frame.as_frame())))
    });
}

fn bench_scan_barcode_full(c: &mut Criterion) {
    let frame = barcode_frame();
    let engine = ScanEngine::new(ScanConfig::default());
    c.bench_function("scan_barcode_full", |b| {
        b.iter(|| engine.scan_once(black_box(&frame.as_frame())))
    });
}

fn bench_scan_blank(c: &mut Criterion) {
    let frame = blank_frame(320, 240, 255);
    let engine = ScanEngine::new(ScanConfig::default());
    c.bench_function("scan_blank_320x240", |b| {
        b.iter(|| engine.scan_once(black_box(&frame.as_frame())))
    });
}

fn bench_scan_noise(c: &mut Criterion) {
    let frame = noise_frame(320, 240, 9);
    let engine = ScanEngine::new(ScanConfig::default());
    c.bench_function("scan_noise_320x240", |b| {
        b.iter(|| engine.scan_once(black_box(&frame.as_frame())))
    });
}

criterion_group!(
    benches,
    bench_scan_barcode_heuristic,
    bench_scan_barcode_full,
    bench_scan_blank,
    bench_scan_noise
);
criterion_main!(benches);
