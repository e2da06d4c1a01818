//! Reader and writer configuration.
//!
//! Limits that bound a single read chunk or a single store write are passed
//! in here rather than held as process-wide constants.

use serde::{Deserialize, Serialize};

/// Upper bound on the samples returned in one segment when no tighter cap
/// is requested.
pub const DEFAULT_MAX_POINTS: usize = 50_000;

/// Configuration for segmented reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Ceiling on segment length. Requested caps outside `(0, ceiling]`
    /// fall back to this value.
    /// Default: 50,000 samples
    pub max_allowed_points: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_allowed_points: DEFAULT_MAX_POINTS,
        }
    }
}

/// Configuration for appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Largest block forwarded to the store in one extend call.
    /// Default: 50,000 samples
    pub max_block_points: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_block_points: DEFAULT_MAX_POINTS,
        }
    }
}

/// Configuration applied to every signal of a recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub writer: WriterConfig,
}
