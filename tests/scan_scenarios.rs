use rust_scan::decoder::pattern::validate_pattern;
use rust_scan::detector::propose_regions;
use rust_scan::models::RunState;
use rust_scan::session::{FrameSampler, ScanSession};
use rust_scan::tools::synthetic::{
    BarcodeSpec, DEFAULT_MODULES, barcode_frame, blank_frame, line_segments_frame, noise_frame,
    text_frame,
};
use rust_scan::{
    CapabilitySet, DecodeError, DetectionSource, GrayPlane, OwnedFrame, PatternLimits,
    PixelLayout, RegionLimits, RunLengthPattern, ScanConfig, ScanEngine, SymbolDecoder, preprocess,
    scan_rgb,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn heuristic_only() -> CapabilitySet {
    CapabilitySet {
        library_decoder_available: false,
        image_toolkit_available: true,
    }
}

fn heuristic_engine() -> ScanEngine {
    ScanEngine::with_capabilities(ScanConfig::default(), heuristic_only())
}

fn is_twelve_digits(payload: &str) -> bool {
    payload.len() == 12 && payload.bytes().all(|b| b.is_ascii_digit())
}

struct Fixed(String);

impl SymbolDecoder for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn decode(&self, _plane: &GrayPlane) -> Result<Vec<String>, DecodeError> {
        Ok(vec![self.0.clone()])
    }
}

#[test]
fn heuristic_path_reads_synthetic_barcode() {
    let frame = barcode_frame();
    let engine = heuristic_engine();
    assert_eq!(engine.strategy_names(), ["heuristic"]);

    let candidate = engine
        .scan_once(&frame.as_frame())
        .expect("bar pattern should be detected");
    assert!(is_twelve_digits(&candidate.payload), "{}", candidate.payload);
    assert_eq!(candidate.source, DetectionSource::FallbackSynthesis);
}

#[test]
fn synthesized_code_is_deterministic_across_engines() {
    let frame = barcode_frame();
    let a = heuristic_engine().scan_once(&frame.as_frame()).unwrap();
    let b = heuristic_engine().scan_once(&frame.as_frame()).unwrap();
    assert_eq!(a.payload, b.payload);
    assert_eq!(a.variant, b.variant);
}

#[test]
fn non_code_frames_yield_nothing() {
    let engine = ScanEngine::new(ScanConfig::default());
    let frames = [
        blank_frame(320, 240, 255),
        blank_frame(320, 240, 0),
        noise_frame(320, 240, 11),
        noise_frame(320, 240, 12),
        text_frame("TRACE SALE", 320, 240, 3),
        line_segments_frame(320, 240, 6, 5),
        line_segments_frame(320, 240, 6, 6),
    ];
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(engine.scan_once(&frame.as_frame()), None, "frame {i}");
    }
}

#[test]
fn empty_frame_yields_nothing() {
    let engine = ScanEngine::new(ScanConfig::default());
    let frame = OwnedFrame::from_plane(GrayPlane::filled(0, 0, 0));
    assert_eq!(engine.scan_once(&frame.as_frame()), None);
}

#[test]
fn cooldown_suppresses_repeat_within_window() {
    let frame = barcode_frame();
    let mut engine = heuristic_engine();
    let t0 = Instant::now();

    let first = engine.scan_at(&frame.as_frame(), t0);
    assert!(first.is_some());
    assert_eq!(engine.scan_at(&frame.as_frame(), t0 + Duration::from_secs(1)), None);
    assert_eq!(engine.state().last_reported_payload(), first.as_deref());
    assert_eq!(engine.state().last_reported_at(), Some(t0));
}

#[test]
fn cooldown_reports_again_after_window() {
    let frame = barcode_frame();
    let mut engine = heuristic_engine();
    let t0 = Instant::now();

    let first = engine.scan_at(&frame.as_frame(), t0);
    let second = engine.scan_at(&frame.as_frame(), t0 + Duration::from_millis(2500));
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn new_session_forgets_last_detection() {
    let frame = barcode_frame();
    let mut engine = heuristic_engine();
    let t0 = Instant::now();

    assert!(engine.scan_at(&frame.as_frame(), t0).is_some());
    engine.start_session();
    assert!(engine.scan_at(&frame.as_frame(), t0).is_some());
}

#[test]
fn no_capabilities_means_manual_entry() {
    let frame = barcode_frame();
    let mut engine = ScanEngine::with_capabilities(ScanConfig::default(), CapabilitySet::none());
    assert!(engine.strategy_names().is_empty());
    assert_eq!(engine.scan(&frame.as_frame()), None);
    assert_eq!(
        engine.status().recommended,
        rust_scan::RecommendedMethod::ManualEntry
    );
}

#[test]
fn config_can_disable_toolkit() {
    let config = ScanConfig {
        allow_toolkit: false,
        ..ScanConfig::default()
    };
    let engine = ScanEngine::with_capabilities(config, heuristic_only());
    assert!(!engine.capabilities().image_toolkit_available);
    assert_eq!(engine.scan_once(&barcode_frame().as_frame()), None);
}

#[test]
fn proposed_regions_respect_bounds() {
    let limits = RegionLimits::default();
    let frames = [
        barcode_frame(),
        noise_frame(320, 240, 3),
        text_frame("TRACE SALE", 320, 240, 3),
        line_segments_frame(320, 240, 8, 9),
    ];

    for frame in &frames {
        let (w, h) = (frame.width() as f32, frame.height() as f32);
        let variants = preprocess(&frame.as_frame(), true, &Default::default());
        for variant in &variants {
            let regions = propose_regions(variant, &limits);
            assert!(regions.len() <= limits.max_regions);
            for region in regions {
                let r = region.rect;
                let area = r.area() as f32;
                assert!(r.width as f32 > limits.min_aspect * r.height as f32);
                assert!(r.width >= limits.min_width && r.height >= limits.min_height);
                assert!(r.area() > limits.min_area);
                assert!(area < limits.max_area_fraction * w * h);
                assert!(r.width as f32 <= limits.max_width_fraction * w);
                assert!(r.height as f32 <= limits.max_height_fraction * h);
                assert_eq!(
                    (region.pixels.width(), region.pixels.height()),
                    (r.width, r.height)
                );
            }
        }
    }
}

#[test]
fn barcode_region_is_found_on_raw_variant() {
    let frame = barcode_frame();
    let variants = preprocess(&frame.as_frame(), true, &Default::default());
    let regions = propose_regions(&variants[0], &RegionLimits::default());
    let top = regions.first().expect("bar region");
    assert_eq!((top.rect.x, top.rect.y), (77, 95));
    assert_eq!((top.rect.width, top.rect.height), (165, 50));
}

#[test]
fn implausible_patterns_are_rejected() {
    let limits = PatternLimits::default();

    let uniform = RunLengthPattern::from_widths(RunState::Bar, &[3; 12]);
    assert!(validate_pattern(&uniform, &limits).is_err());

    let short = RunLengthPattern::from_widths(RunState::Bar, &[1, 2, 3, 1, 2]);
    assert!(validate_pattern(&short, &limits).is_err());

    let skewed = RunLengthPattern::from_widths(
        RunState::Bar,
        &[1, 2, 3, 1, 2, 3, 1, 2, 3, 40, 1, 2],
    );
    assert!(validate_pattern(&skewed, &limits).is_err());

    let widths: Vec<u32> = DEFAULT_MODULES.iter().map(|m| m * 3).collect();
    let good = RunLengthPattern::from_widths(RunState::Bar, &widths);
    assert!(validate_pattern(&good, &limits).is_ok());
}

#[test]
fn symbols_sharing_leading_widths_collide() {
    // Same first 30 widths, same ink coverage and size; only the tail differs.
    let mut a = DEFAULT_MODULES.to_vec();
    a.extend([2, 1, 3, 3]);
    let mut b = DEFAULT_MODULES.to_vec();
    b.extend([2, 3, 3, 1]);

    let render = |modules: Vec<u32>| {
        BarcodeSpec {
            modules,
            ..BarcodeSpec::default()
        }
        .render()
    };
    let frame_a = render(a);
    let frame_b = render(b);
    assert_ne!(frame_a, frame_b);

    let engine = heuristic_engine();
    let pa = engine.scan_once(&frame_a.as_frame()).expect("first symbol");
    let pb = engine.scan_once(&frame_b.as_frame()).expect("second symbol");
    assert_eq!(pa.payload, pb.payload);
}

#[test]
fn library_result_wins_over_heuristic() {
    let engine = ScanEngine::with_backend(
        ScanConfig::default(),
        CapabilitySet::all(),
        Some(Arc::new(Fixed("036000291452".to_string()))),
    );
    let candidate = engine.scan_once(&barcode_frame().as_frame()).unwrap();
    assert_eq!(candidate.payload, "036000291452");
    assert_eq!(candidate.source, DetectionSource::Library);
    assert_eq!(candidate.variant, "raw");
}

#[test]
fn catalog_admits_known_long_codes() {
    let long_code = "ab".repeat(300);
    let decoder: Arc<dyn SymbolDecoder> = Arc::new(Fixed(long_code.clone()));
    let frame = blank_frame(64, 64, 255);

    let plain = ScanEngine::with_backend(
        ScanConfig::default(),
        CapabilitySet::all(),
        Some(Arc::clone(&decoder)),
    );
    assert_eq!(plain.scan_once(&frame.as_frame()), None);

    let catalog: HashSet<String> = [long_code.to_uppercase()].into_iter().collect();
    let with_catalog =
        ScanEngine::with_backend(ScanConfig::default(), CapabilitySet::all(), Some(decoder))
            .with_catalog(Arc::new(catalog));
    let candidate = with_catalog.scan_once(&frame.as_frame()).unwrap();
    assert_eq!(candidate.payload, long_code);
}

#[test]
fn session_reports_held_code_once() {
    let mut config = ScanConfig::default();
    config.gate.cooldown = Duration::from_secs(60);
    let engine = ScanEngine::with_capabilities(config, heuristic_only());
    let frames: Vec<OwnedFrame> = (0..10).map(|_| barcode_frame()).collect();

    let session = ScanSession::spawn(engine, frames, FrameSampler::new(5));
    let mut detections = Vec::new();
    while let Some(candidate) = session.recv() {
        detections.push(candidate);
    }
    let (engine, summary) = session.join().expect("scan thread");

    assert_eq!(detections.len(), 1);
    assert!(is_twelve_digits(&detections[0].payload));
    assert_eq!(summary.frames_seen, 10);
    assert_eq!(summary.frames_scanned, 2);
    assert_eq!(summary.detections, 1);
    assert_eq!(
        engine.state().last_reported_payload(),
        Some(detections[0].payload.as_str())
    );
}

#[test]
fn scan_rgb_reads_color_frames() {
    let rgb = barcode_frame().to_layout(PixelLayout::Rgb);
    let payload = scan_rgb(rgb.as_frame().as_bytes(), rgb.width(), rgb.height())
        .expect("barcode in rgb frame");
    assert!(is_twelve_digits(&payload));

    assert_eq!(scan_rgb(&[0u8; 10], 320, 240), None);
}
