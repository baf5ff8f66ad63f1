//! Error types for the boundaries of the engine.
//!
//! Nothing inside a scan call is fatal: these errors surface only where a
//! caller builds a frame, loads an image file or talks to a decode backend
//! directly. The orchestrator turns all of them into "no detection".

use thiserror::Error;

/// A pixel buffer that does not describe a valid frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error(
        "frame buffer holds {actual} bytes, expected {expected} for {width}x{height}x{channels}"
    )]
    SizeMismatch {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("frame dimensions {width}x{height}x{channels} overflow the address space")]
    TooLarge {
        width: usize,
        height: usize,
        channels: usize,
    },
}

/// Failure inside a symbol decoder backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{backend}: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
    #[error("{0} panicked")]
    Panicked(&'static str),
}

/// Errors at the file-scan boundary
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}
