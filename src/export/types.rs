//! Common types for the export module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::layout::{LayoutError, LayoutKind};

// ============================================================
// Constants
// ============================================================

/// Hashtag block used when none is configured
pub const DEFAULT_HASHTAGS: &str = "#fashion #trending #ootd";

/// Line between the hook and the code list
pub const CAPTION_SEPARATOR: &str = "------------------";

/// Header above the code list
pub const CODES_HEADER: &str = "Product codes:";

/// Per-group caption file
pub const CAPTION_FILE: &str = "caption.txt";

/// Export-wide summary file
pub const SUMMARY_FILE: &str = "export_summary.txt";

// ============================================================
// Error Types
// ============================================================

/// Export error types
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode failed: {0}")]
    Encode(#[from] LayoutError),

    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),

    #[error("No finished items to export")]
    NothingToExport,
}

pub type Result<T> = std::result::Result<T, ExportError>;

// ============================================================
// Caption Settings
// ============================================================

/// Text inputs for consolidated captions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Optional first line of every caption
    pub title: Option<String>,
    /// Product type, used for hooks and the fallback sentence
    pub product_type: String,
    /// Occasion, used for hooks and the fallback sentence
    pub occasion: String,
    /// Hashtag block appended to every caption
    pub hashtags: String,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            title: None,
            product_type: String::new(),
            occasion: String::new(),
            hashtags: DEFAULT_HASHTAGS.to_string(),
        }
    }
}

// ============================================================
// Artifacts
// ============================================================

/// Encoded outputs for one Done item
#[derive(Debug, Clone)]
pub struct ItemArtifact {
    /// Safe base name, no extension
    pub name: String,
    /// Collage PNG
    pub image_png: Vec<u8>,
    /// Cover PNG (absent when the item had no chosen image)
    pub cover_png: Option<Vec<u8>>,
}

/// One chunk of items sharing a caption
#[derive(Debug, Clone)]
pub struct ExportGroup {
    /// 1-based group number
    pub index: usize,
    /// Folder name, e.g. `Group_1_Sets_Set1_to_Set4`
    pub folder_name: String,
    /// Consolidated caption text
    pub caption: String,
    pub artifacts: Vec<ItemArtifact>,
}

/// One exported item, as written to the summary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    pub folder: String,
    pub label: String,
    pub layout: LayoutKind,
    pub output: String,
}

impl fmt::Display for SummaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SUCCESS] Folder: {} | Set: {} | Layout: {} | Output: {}.png",
            self.folder, self.label, self.layout, self.output
        )
    }
}

/// Everything the archive writer needs
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    pub groups: Vec<ExportGroup>,
    pub summary: Vec<SummaryRecord>,
}

impl ExportBundle {
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.artifacts.len()).sum()
    }

    /// Summary file contents, one line per record
    pub fn summary_text(&self) -> String {
        summary_text(&self.summary)
    }
}

/// Summary file contents, one line per record
pub fn summary_text(records: &[SummaryRecord]) -> String {
    let mut text = records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
