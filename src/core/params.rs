use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ResampleFilter;

pub const DEFAULT_INPUT_DIR: &str = "unresized";
pub const DEFAULT_WIDTH: u32 = 1440;
pub const DEFAULT_HEIGHT: u32 = 900;

pub const DEFAULT_ENGINE: &str = "Serendipity-1.0.0.jar";
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 2_000;

/// Resize job parameters suitable for presets and CLI defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeParams {
    pub input_dir: PathBuf,
    /// Exact output width in pixels; aspect ratio is not preserved
    pub width: u32,
    /// Exact output height in pixels
    pub height: u32,
    pub filter: ResampleFilter,
}

impl Default for ResizeParams {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            filter: ResampleFilter::Lanczos3,
        }
    }
}

/// Engine probe parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeParams {
    /// Engine JAR or native executable
    pub engine: PathBuf,
    /// Read window, measured from the moment the handshake has been sent
    pub timeout_ms: u64,
    /// How long the engine gets to exit after `quit` before it is killed
    pub shutdown_grace_ms: u64,
}

impl ProbeParams {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for ProbeParams {
    fn default() -> Self {
        Self {
            engine: PathBuf::from(DEFAULT_ENGINE),
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
        }
    }
}
