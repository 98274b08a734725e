//! Common types for the heal module

use serde::{Deserialize, Serialize};

// ============================================================
// Constants
// ============================================================

/// Permille scale of defect coordinates
pub const PERMILLE: u16 = 1000;

/// Padding added around a mapped defect box, in surface pixels
pub const DEFAULT_HEAL_PAD: u32 = 15;

/// Gaussian sigma applied to the synthesized patch
pub const DEFAULT_BLUR_SIGMA: f32 = 4.0;

/// Full width of the uniform noise band (values span +/- half of this)
pub const DEFAULT_NOISE_AMPLITUDE: f32 = 15.0;

/// Opacity of the bottom, left and right edge strips
pub const DEFAULT_EDGE_ALPHA: f32 = 0.5;

// ============================================================
// Defect Box
// ============================================================

/// Rectangle to heal, in permille of the source image.
///
/// Coordinates come from upstream classification and are not trusted:
/// use [`DefectBox::validated`] before mapping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectBox {
    #[serde(alias = "hasLogo", alias = "has_logo")]
    pub present: bool,
    pub xmin: u16,
    pub ymin: u16,
    pub xmax: u16,
    pub ymax: u16,
}

impl DefectBox {
    /// A box with no defect
    pub fn absent() -> Self {
        Self::default()
    }

    /// A present defect box
    pub fn new(xmin: u16, ymin: u16, xmax: u16, ymax: u16) -> Self {
        Self {
            present: true,
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Clamp to [0, 1000] and drop absent or zero-area boxes
    pub fn validated(&self) -> Option<DefectBox> {
        if !self.present {
            return None;
        }
        let clamped = DefectBox {
            present: true,
            xmin: self.xmin.min(PERMILLE),
            ymin: self.ymin.min(PERMILLE),
            xmax: self.xmax.min(PERMILLE),
            ymax: self.ymax.min(PERMILLE),
        };
        if clamped.xmax <= clamped.xmin || clamped.ymax <= clamped.ymin {
            return None;
        }
        Some(clamped)
    }

    /// Whether healing this box would touch the surface
    pub fn is_usable(&self) -> bool {
        self.validated().is_some()
    }
}

/// Options for region healing
#[derive(Debug, Clone)]
pub struct HealOptions {
    /// Padding around the mapped defect box in pixels
    pub pad: u32,
    /// Patch blur sigma (must be positive to blur)
    pub blur_sigma: f32,
    /// Noise band width per channel
    pub noise_amplitude: f32,
    /// Opacity of secondary edge strips
    pub edge_alpha: f32,
}

impl Default for HealOptions {
    fn default() -> Self {
        Self {
            pad: DEFAULT_HEAL_PAD,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
            edge_alpha: DEFAULT_EDGE_ALPHA,
        }
    }
}

impl HealOptions {
    /// Options without blur or noise, for deterministic fills
    pub fn flat() -> Self {
        Self {
            blur_sigma: 0.0,
            noise_amplitude: 0.0,
            ..Default::default()
        }
    }
}
