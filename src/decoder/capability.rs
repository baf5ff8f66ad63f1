//! Capability probing.
//!
//! Each optional backend is exercised once on a blank input. A backend that
//! errors or panics is recorded as absent; probing itself never fails.

use super::config::ScanConfig;
use super::library::{decode_guarded, default_decoder};
use crate::decoder::config::PreprocessConfig;
use crate::models::{Frame, GrayPlane};
use crate::preprocess::preprocess;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;
use tracing::{info, warn};

const PROBE_SIZE: usize = 16;

/// Which decode backends are usable in this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub library_decoder_available: bool,
    pub image_toolkit_available: bool,
}

impl CapabilitySet {
    /// Nothing available: every scan returns no detection
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            library_decoder_available: true,
            image_toolkit_available: true,
        }
    }

    /// Apply the operator switches from `config`
    pub fn masked(self, config: &ScanConfig) -> Self {
        Self {
            library_decoder_available: self.library_decoder_available && config.allow_library,
            image_toolkit_available: self.image_toolkit_available && config.allow_toolkit,
        }
    }

    pub fn summary(&self) -> String {
        let flag = |available: bool| if available { "available" } else { "unavailable" };
        format!(
            "library decoder {}, image toolkit {}",
            flag(self.library_decoder_available),
            flag(self.image_toolkit_available)
        )
    }
}

static CAPABILITIES: OnceLock<CapabilitySet> = OnceLock::new();

/// Probe the backends once per process and return the cached result
pub fn detect_capabilities() -> CapabilitySet {
    *CAPABILITIES.get_or_init(|| {
        let capabilities = CapabilitySet {
            library_decoder_available: probe_library(),
            image_toolkit_available: probe_toolkit(),
        };
        info!("scan capabilities: {}", capabilities.summary());
        capabilities
    })
}

fn probe_library() -> bool {
    let Some(decoder) = default_decoder() else {
        info!("no symbol decoder backend compiled in");
        return false;
    };
    let blank = GrayPlane::filled(PROBE_SIZE, PROBE_SIZE, 255);
    match decode_guarded(decoder.as_ref(), &blank) {
        Ok(_) => true,
        Err(e) => {
            warn!("symbol decoder probe failed: {e}");
            false
        }
    }
}

fn probe_toolkit() -> bool {
    let blank = vec![255u8; PROBE_SIZE * PROBE_SIZE];
    let Ok(frame) = Frame::gray(&blank, PROBE_SIZE, PROBE_SIZE) else {
        return false;
    };
    let config = PreprocessConfig::default();
    match catch_unwind(AssertUnwindSafe(|| preprocess(&frame, true, &config).len())) {
        Ok(count) => count > 1,
        Err(_) => {
            warn!("image toolkit probe panicked");
            false
        }
    }
}
