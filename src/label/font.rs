//! Font loading for labels

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::types::{LabelError, Result, SYSTEM_FONT_CANDIDATES};

/// A loaded TrueType/OpenType font, cheap to clone
#[derive(Clone)]
pub struct LabelFont {
    font: Arc<FontVec>,
    path: PathBuf,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").field("path", &self.path).finish()
    }
}

impl LabelFont {
    /// Load a font file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LabelError::FontNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let font =
            FontVec::try_from_vec(bytes).map_err(|_| LabelError::InvalidFont(path.to_path_buf()))?;
        Ok(Self {
            font: Arc::new(font),
            path: path.to_path_buf(),
        })
    }

    /// Load the explicit font if given, else the first usable system font
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for candidate in SYSTEM_FONT_CANDIDATES {
            match Self::load(Path::new(candidate)) {
                Ok(font) => {
                    debug!(path = %candidate, "Loaded label font");
                    return Ok(font);
                }
                Err(LabelError::FontNotFound(_)) => continue,
                Err(e) => debug!(path = %candidate, error = %e, "Skipping font candidate"),
            }
        }
        Err(LabelError::NoFontAvailable)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }

    /// Rendered width of `text` at `size` pixels
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let (w, _) = imageproc::drawing::text_size(PxScale::from(size), &*self.font, text);
        w as f32
    }

    /// Distance from the top of the line to the baseline at `size` pixels
    pub fn ascent(&self, size: f32) -> f32 {
        self.font.as_scaled(PxScale::from(size)).ascent()
    }
}
