//! Layout module core types
//!
//! Layout kinds, composition configuration and compositor errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::LabelAnchor;

// ============================================================
// Constants
// ============================================================

/// Default output width (vertical 4K)
pub const DEFAULT_OUTPUT_WIDTH: u32 = 2160;

/// Default output height (vertical 4K)
pub const DEFAULT_OUTPUT_HEIGHT: u32 = 3840;

/// Default background color
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

// ============================================================
// Error Types
// ============================================================

/// Compositor error types
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Layout {layout} needs {required} images, got {supplied}")]
    InsufficientImages {
        layout: LayoutKind,
        required: usize,
        supplied: usize,
    },

    #[error("Invalid composition config: {0}")]
    InvalidConfig(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Encode failed: {0}")]
    EncodeFailed(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

// ============================================================
// Layout Kind
// ============================================================

/// Named grid arrangement; the name reads columns x rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Two cells side by side
    #[default]
    #[serde(rename = "2x1")]
    TwoByOne,
    /// Two cells stacked
    #[serde(rename = "1x2")]
    OneByTwo,
    /// Four cells in a 2x2 grid
    #[serde(rename = "2x2")]
    TwoByTwo,
    /// Four cells side by side
    #[serde(rename = "4x1")]
    FourByOne,
    /// One full-frame cell
    #[serde(rename = "1x1")]
    OneByOne,
}

impl LayoutKind {
    /// All layouts
    pub fn all() -> [LayoutKind; 5] {
        [
            LayoutKind::TwoByOne,
            LayoutKind::OneByTwo,
            LayoutKind::TwoByTwo,
            LayoutKind::FourByOne,
            LayoutKind::OneByOne,
        ]
    }

    /// Number of source images the layout needs
    pub fn required_images(&self) -> usize {
        let (cols, rows) = self.grid();
        (cols * rows) as usize
    }

    /// Grid shape as (columns, rows)
    pub fn grid(&self) -> (u32, u32) {
        match self {
            LayoutKind::TwoByOne => (2, 1),
            LayoutKind::OneByTwo => (1, 2),
            LayoutKind::TwoByTwo => (2, 2),
            LayoutKind::FourByOne => (4, 1),
            LayoutKind::OneByOne => (1, 1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::TwoByOne => "2x1",
            LayoutKind::OneByTwo => "1x2",
            LayoutKind::TwoByTwo => "2x2",
            LayoutKind::FourByOne => "4x1",
            LayoutKind::OneByOne => "1x1",
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LayoutKind::all()
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown layout: {s} (expected 2x1, 1x2, 2x2, 4x1 or 1x1)"))
    }
}

// ============================================================
// Composition Config
// ============================================================

/// Settings for one composition call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Output width in pixels
    pub output_width: u32,
    /// Output height in pixels
    pub output_height: u32,
    /// Gap between cells and around the outer edge
    pub gap_px: u32,
    /// Background fill (RGB)
    pub background_color: [u8; 3],
    /// Heal classifier-reported defects per cell
    pub heal_defects: bool,
    /// Trim uniform borders before fitting
    pub trim_borders: bool,
    /// Per-cell corner captions or one centered title
    pub label_mode: LabelAnchor,
    /// Title text for center mode
    pub global_label: Option<String>,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            gap_px: 0,
            background_color: DEFAULT_BACKGROUND,
            heal_defects: false,
            trim_borders: true,
            label_mode: LabelAnchor::Center,
            global_label: None,
        }
    }
}

impl CompositionConfig {
    /// Create a builder
    pub fn builder() -> CompositionConfigBuilder {
        CompositionConfigBuilder::default()
    }

    /// Check dimensions
    pub fn validate(&self) -> Result<()> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(LayoutError::InvalidConfig(format!(
                "output size must be positive, got {}x{}",
                self.output_width, self.output_height
            )));
        }
        Ok(())
    }

    /// Same settings with a different title
    #[must_use]
    pub fn with_global_label(&self, label: impl Into<String>) -> Self {
        Self {
            global_label: Some(label.into()),
            ..self.clone()
        }
    }
}

/// Builder for CompositionConfig
#[derive(Debug, Default)]
pub struct CompositionConfigBuilder {
    config: CompositionConfig,
}

impl CompositionConfigBuilder {
    #[must_use]
    pub fn output_size(mut self, width: u32, height: u32) -> Self {
        self.config.output_width = width;
        self.config.output_height = height;
        self
    }

    #[must_use]
    pub fn gap(mut self, gap_px: u32) -> Self {
        self.config.gap_px = gap_px;
        self
    }

    #[must_use]
    pub fn background_color(mut self, rgb: [u8; 3]) -> Self {
        self.config.background_color = rgb;
        self
    }

    #[must_use]
    pub fn heal_defects(mut self, heal: bool) -> Self {
        self.config.heal_defects = heal;
        self
    }

    #[must_use]
    pub fn trim_borders(mut self, trim: bool) -> Self {
        self.config.trim_borders = trim;
        self
    }

    #[must_use]
    pub fn label_mode(mut self, mode: LabelAnchor) -> Self {
        self.config.label_mode = mode;
        self
    }

    #[must_use]
    pub fn global_label(mut self, label: impl Into<String>) -> Self {
        self.config.global_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CompositionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_images() {
        assert_eq!(LayoutKind::TwoByOne.required_images(), 2);
        assert_eq!(LayoutKind::OneByTwo.required_images(), 2);
        assert_eq!(LayoutKind::TwoByTwo.required_images(), 4);
        assert_eq!(LayoutKind::FourByOne.required_images(), 4);
        assert_eq!(LayoutKind::OneByOne.required_images(), 1);
    }

    #[test]
    fn test_layout_parse_and_display() {
        for kind in LayoutKind::all() {
            assert_eq!(kind.to_string().parse::<LayoutKind>().unwrap(), kind);
        }
        assert!("3x3".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn test_layout_serde_names() {
        let json = serde_json::to_string(&LayoutKind::TwoByTwo).unwrap();
        assert_eq!(json, "\"2x2\"");
        let kind: LayoutKind = serde_json::from_str("\"4x1\"").unwrap();
        assert_eq!(kind, LayoutKind::FourByOne);
    }

    #[test]
    fn test_config_defaults() {
        let config = CompositionConfig::default();
        assert_eq!(config.output_width, 2160);
        assert_eq!(config.output_height, 3840);
        assert_eq!(config.gap_px, 0);
        assert_eq!(config.background_color, [255, 255, 255]);
        assert!(config.trim_borders);
        assert!(!config.heal_defects);
        assert_eq!(config.label_mode, LabelAnchor::Center);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CompositionConfig::builder()
            .output_size(1200, 800)
            .gap(10)
            .background_color([0, 0, 0])
            .heal_defects(true)
            .trim_borders(false)
            .label_mode(LabelAnchor::Corner)
            .global_label("Set 1")
            .build();
        assert_eq!(config.output_width, 1200);
        assert_eq!(config.gap_px, 10);
        assert!(config.heal_defects);
        assert!(!config.trim_borders);
        assert_eq!(config.global_label.as_deref(), Some("Set 1"));
    }

    #[test]
    fn test_invalid_size() {
        let config = CompositionConfig::builder().output_size(0, 100).build();
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_with_global_label_keeps_settings() {
        let config = CompositionConfig::builder().gap(7).build();
        let relabeled = config.with_global_label("Set 9");
        assert_eq!(relabeled.gap_px, 7);
        assert_eq!(relabeled.global_label.as_deref(), Some("Set 9"));
    }

    #[test]
    fn test_error_display() {
        let err = LayoutError::InsufficientImages {
            layout: LayoutKind::TwoByTwo,
            required: 4,
            supplied: 3,
        };
        assert_eq!(err.to_string(), "Layout 2x2 needs 4 images, got 3");
    }
}
