//! Common types for the label module

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Output width at which base sizes apply unscaled
pub const REFERENCE_WIDTH: f32 = 1200.0;

/// Base font size for per-cell labels
pub const CELL_FONT_SIZE: f32 = 70.0;

/// Base font size for the single centered title label
pub const TITLE_FONT_SIZE: f32 = 100.0;

/// Base padding between text and background edge
pub const LABEL_PADDING: f32 = 20.0;

/// Base margin from the cell edge for corner labels
pub const CORNER_MARGIN: f32 = 20.0;

/// Base corner radius of the background
pub const CORNER_RADIUS: f32 = 10.0;

/// Background opacity (black)
pub const BACKGROUND_OPACITY: f32 = 0.6;

/// Well-known bold sans-serif font locations, tried in order
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

// ============================================================
// Error Types
// ============================================================

/// Label rendering error types
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Font not found: {0}")]
    FontNotFound(PathBuf),

    #[error("Invalid font file: {0}")]
    InvalidFont(PathBuf),

    #[error("No usable font available")]
    NoFontAvailable,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LabelError>;

// ============================================================
// Data Structures
// ============================================================

/// Where a label is anchored inside its rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAnchor {
    /// Bottom-left corner with margin
    Corner,
    /// Centered on both axes
    #[default]
    Center,
}

impl std::fmt::Display for LabelAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelAnchor::Corner => write!(f, "corner"),
            LabelAnchor::Center => write!(f, "center"),
        }
    }
}

impl std::str::FromStr for LabelAnchor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corner" | "bottom-left" => Ok(LabelAnchor::Corner),
            "center" => Ok(LabelAnchor::Center),
            other => Err(format!("unknown label anchor: {other}")),
        }
    }
}

/// Resolved label placement, in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    /// Font pixel size
    pub font_size: f32,
    /// Background left edge
    pub box_x: f32,
    /// Background top edge
    pub box_y: f32,
    /// Background width
    pub box_width: f32,
    /// Background height
    pub box_height: f32,
    /// Background corner radius
    pub radius: f32,
    /// Left edge of the text
    pub text_x: f32,
    /// Text baseline
    pub baseline: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_parse() {
        assert_eq!("corner".parse::<LabelAnchor>().unwrap(), LabelAnchor::Corner);
        assert_eq!("bottom-left".parse::<LabelAnchor>().unwrap(), LabelAnchor::Corner);
        assert_eq!("CENTER".parse::<LabelAnchor>().unwrap(), LabelAnchor::Center);
        assert!("top".parse::<LabelAnchor>().is_err());
    }

    #[test]
    fn test_anchor_default_and_display() {
        assert_eq!(LabelAnchor::default(), LabelAnchor::Center);
        assert_eq!(LabelAnchor::Corner.to_string(), "corner");
    }

    #[test]
    fn test_error_display() {
        let err = LabelError::FontNotFound(PathBuf::from("/x.ttf"));
        assert!(err.to_string().contains("not found"));
        assert!(LabelError::NoFontAvailable.to_string().contains("font"));
    }
}
