//! Helpers for binaries, benches and tests: image loading, file scans and
//! synthetic frame generators.

use crate::error::ScanError;
use crate::models::{DetectionCandidate, OwnedFrame, PixelLayout};
use crate::pipeline::ScanEngine;
use image::GenericImageView;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod synthetic;

fn max_dim_from_env() -> Option<u32> {
    match env::var("SCAN_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as an RGB frame.
///
/// Images larger than `SCAN_MAX_DIM` on their longest side are downscaled
/// first.
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<OwnedFrame, ScanError> {
    let img = image::open(path)?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    Ok(OwnedFrame::new(
        rgb.into_raw(),
        width as usize,
        height as usize,
        PixelLayout::Rgb,
    )?)
}

/// Scan one image file exactly once, bypassing the cooldown gate
pub fn scan_image_file<P: AsRef<Path>>(
    engine: &ScanEngine,
    path: P,
) -> Result<Option<DetectionCandidate>, ScanError> {
    let frame = load_frame(path)?;
    Ok(engine.scan_once(&frame.as_frame()))
}

/// Expand command-line arguments into image paths; directories are walked
/// recursively and sorted.
pub fn image_paths<I, P>(args: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut paths = Vec::new();
    for arg in args {
        let path = arg.as_ref();
        if path.is_dir() {
            let mut images = collect_images(path);
            images.sort();
            paths.extend(images);
        } else {
            paths.push(path.to_path_buf());
        }
    }
    paths
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if ext == "png" || ext == "jpg" || ext == "jpeg" || ext == "gif" || ext == "bmp" {
                    images.push(path);
                }
            }
        }
    }

    images
}
