//! Common types for the batch module

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::candidate::{CandidateImage, CandidateInfo};
use crate::classify::RetryPolicy;
use crate::layout::{CompositionConfig, LayoutKind};

// ============================================================
// Constants
// ============================================================

/// Files analyzed per folder
pub const DEFAULT_SCAN_LIMIT: usize = 20;

/// Pause after every remote classification call
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_secs(2);

/// Default label prefix ("Set 1", "Set 2", ...)
pub const DEFAULT_LABEL_PREFIX: &str = "Set";

/// Supported input extensions (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

// ============================================================
// Error Types
// ============================================================

/// Batch error types
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid transition for '{folder}': {from} -> {to}")]
    InvalidState {
        folder: String,
        from: FolderStatus,
        to: FolderStatus,
    },

    #[error("Item index {index} out of range ({len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid sequence range: start={start}, end={end}")]
    InvalidSequence { start: u32, end: u32 },

    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, BatchError>;

// ============================================================
// Folder Status
// ============================================================

/// Lifecycle of one folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    #[default]
    Pending,
    Analyzing,
    Generating,
    Done,
    Failed,
    Skipped,
}

impl FolderStatus {
    pub fn name(&self) -> &'static str {
        match self {
            FolderStatus::Pending => "Pending",
            FolderStatus::Analyzing => "Analyzing",
            FolderStatus::Generating => "Generating",
            FolderStatus::Done => "Done",
            FolderStatus::Failed => "Failed",
            FolderStatus::Skipped => "Skipped",
        }
    }

    /// Terminal for a batch run
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            FolderStatus::Done | FolderStatus::Failed | FolderStatus::Skipped
        )
    }

    /// Allowed state machine edges
    pub fn can_transition_to(&self, next: FolderStatus) -> bool {
        use FolderStatus::*;
        matches!(
            (self, next),
            (Pending, Analyzing)
                | (Analyzing, Generating)
                | (Analyzing, Skipped)
                | (Analyzing, Failed)
                | (Generating, Done)
                | (Generating, Failed)
                | (Done, Generating)
        )
    }
}

impl std::fmt::Display for FolderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================
// Filter Mode
// ============================================================

/// Whether a two-subject image may stand in when singles run short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Single-subject images only
    Strict,
    /// Fall back to one two-subject image as a 1x1
    #[default]
    Smart,
}

impl FilterMode {
    pub fn allows_dual_fallback(&self) -> bool {
        matches!(self, FilterMode::Smart)
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(FilterMode::Strict),
            "smart" => Ok(FilterMode::Smart),
            other => Err(format!("unknown filter mode: {other} (expected strict or smart)")),
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Strict => write!(f, "strict"),
            FilterMode::Smart => write!(f, "smart"),
        }
    }
}

// ============================================================
// Folder Batch Item
// ============================================================

/// One input folder through its lifecycle
#[derive(Debug, Clone, Default)]
pub struct FolderBatchItem {
    /// Folder name, used as identity and in reports
    pub folder: String,
    /// Folder path
    pub path: PathBuf,
    /// Image files found in the folder, sorted
    pub files: Vec<PathBuf>,
    pub status: FolderStatus,
    /// Human-readable status line
    pub message: String,
    /// Failure or skip detail
    pub error: Option<String>,
    /// Single-subject candidates found
    pub single_count: usize,
    /// Two-subject candidates found
    pub dual_count: usize,
    pub layout: Option<LayoutKind>,
    /// Every analyzed candidate of the scan window, in file order
    pub candidates: Vec<CandidateInfo>,
    /// Candidates drawn into the collage, in cell order
    pub chosen: Vec<CandidateImage>,
    /// Sequence label, e.g. "Set 3"
    pub label: Option<String>,
    pub product_code: Option<String>,
    /// File-system safe output base name (no extension)
    pub output_name: Option<String>,
    /// Rendered collage once Done
    pub result: Option<RgbaImage>,
}

impl FolderBatchItem {
    /// New pending item
    pub fn new(folder: impl Into<String>, path: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            path: path.into(),
            files,
            message: "Waiting".to_string(),
            ..Self::default()
        }
    }

    /// Move to `next`, rejecting edges outside the state machine
    pub fn transition(&mut self, next: FolderStatus, message: impl Into<String>) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(BatchError::InvalidState {
                folder: self.folder.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.message = message.into();
        if matches!(next, FolderStatus::Analyzing | FolderStatus::Generating) {
            self.error = None;
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == FolderStatus::Done
    }
}

// ============================================================
// Options
// ============================================================

/// Batch run settings
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Files analyzed per folder
    pub scan_limit: usize,
    /// Pause after each remote classification call
    pub call_delay: Duration,
    pub filter_mode: FilterMode,
    /// Label prefix
    pub label_prefix: String,
    /// Composition settings; the title is set per folder
    pub composition: CompositionConfig,
    /// Retry policy for classification calls
    pub retry: RetryPolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
            call_delay: DEFAULT_CALL_DELAY,
            filter_mode: FilterMode::default(),
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            composition: CompositionConfig::default(),
            retry: RetryPolicy::classification(),
        }
    }
}

impl BatchOptions {
    pub fn builder() -> BatchOptionsBuilder {
        BatchOptionsBuilder::default()
    }
}

/// Builder for BatchOptions
#[derive(Debug, Default)]
pub struct BatchOptionsBuilder {
    options: BatchOptions,
}

impl BatchOptionsBuilder {
    /// Files per folder (at least 1)
    #[must_use]
    pub fn scan_limit(mut self, limit: usize) -> Self {
        self.options.scan_limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn call_delay(mut self, delay: Duration) -> Self {
        self.options.call_delay = delay;
        self
    }

    #[must_use]
    pub fn filter_mode(mut self, mode: FilterMode) -> Self {
        self.options.filter_mode = mode;
        self
    }

    #[must_use]
    pub fn label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.label_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn composition(mut self, config: CompositionConfig) -> Self {
        self.options.composition = config;
        self
    }

    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.options.retry = policy;
        self
    }

    #[must_use]
    pub fn build(self) -> BatchOptions {
        self.options
    }
}

/// Outcome counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Folders left pending by cancellation
    pub cancelled: usize,
}
