//! Source images and analyzed candidates
//!
//! A [`SourceImage`] is one decoded input file. A [`CandidateImage`] is a source
//! annotated by classification; it is what the selection engine tiers and what
//! the compositor draws.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classify::Classification;
use crate::heal::DefectBox;

/// A decoded input image. The bitmap is shared, never mutated.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Path the image was decoded from (empty for in-memory images)
    pub path: PathBuf,
    /// File name used for product code extraction
    pub file_name: String,
    /// Decoded pixels
    pub bitmap: Arc<RgbaImage>,
}

impl SourceImage {
    /// Decode an image file
    pub fn open(path: &Path) -> image::ImageResult<Self> {
        let bitmap = image::open(path)?.to_rgba8();
        Ok(Self {
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            bitmap: Arc::new(bitmap),
        })
    }

    /// Wrap an in-memory bitmap
    pub fn from_bitmap(file_name: impl Into<String>, bitmap: RgbaImage) -> Self {
        Self {
            path: PathBuf::new(),
            file_name: file_name.into(),
            bitmap: Arc::new(bitmap),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.bitmap.dimensions()
    }
}

/// A source image with its analysis
#[derive(Debug, Clone)]
pub struct CandidateImage {
    pub source: SourceImage,
    pub has_subject: bool,
    pub subject_count: u32,
    pub is_multi_panel: bool,
    pub defect: DefectBox,
    /// Per-cell caption, drawn in corner label mode
    pub caption: Option<String>,
}

impl CandidateImage {
    /// Build a candidate from a (normalized) classification
    pub fn new(source: SourceImage, analysis: Classification) -> Self {
        let analysis = analysis.normalized();
        Self {
            source,
            has_subject: analysis.has_subject,
            subject_count: analysis.subject_count,
            is_multi_panel: analysis.is_multi_panel,
            defect: analysis.defect,
            caption: None,
        }
    }

    /// Single subject, no defect
    pub fn plain(source: SourceImage) -> Self {
        Self::new(source, Classification::single_subject())
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.caption = if caption.trim().is_empty() {
            None
        } else {
            Some(caption)
        };
        self
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.source.bitmap
    }

    pub fn file_name(&self) -> &str {
        &self.source.file_name
    }
}

/// Analysis of one candidate without its pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub has_subject: bool,
    pub subject_count: u32,
    pub is_multi_panel: bool,
    pub defect: DefectBox,
}

impl From<&CandidateImage> for CandidateInfo {
    fn from(c: &CandidateImage) -> Self {
        Self {
            path: c.source.path.clone(),
            file_name: c.source.file_name.clone(),
            has_subject: c.has_subject,
            subject_count: c.subject_count,
            is_multi_panel: c.is_multi_panel,
            defect: c.defect,
        }
    }
}
