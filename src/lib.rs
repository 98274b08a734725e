//! listing-collage - Collage and cover generation for e-commerce product photos
//!
//! Composes several product photographs into one fixed-resolution collage,
//! and runs that composition as a batch over many image folders with
//! classification-assisted candidate selection and grouped caption export.
//!
//! # Features
//!
//! - **Border trimming**: crop uniform white or transparent margins
//! - **Defect healing**: cosmetic fill over watermark-like regions
//! - **Layouts**: 2x1, 1x2, 2x2, 4x1 and 1x1 grids with configurable gaps
//! - **Labels**: corner captions or one centered title
//! - **Covers**: full-bleed 9:16 covers from a single image
//! - **Batch**: per-folder selection, cyclic set labels, cancellation
//! - **Export**: dated archive folders with consolidated captions
//!
//! # Example
//!
//! ```rust,no_run
//! use listing_collage::{
//!     CandidateImage, CompositionConfig, Compositor, LayoutKind, SourceImage,
//! };
//! use std::path::Path;
//!
//! let images: Vec<CandidateImage> = ["a.png", "b.png"]
//!     .iter()
//!     .map(|p| CandidateImage::plain(SourceImage::open(Path::new(p)).unwrap()))
//!     .collect();
//! let collage = Compositor::default()
//!     .compose(&images, LayoutKind::TwoByOne, &CompositionConfig::default())
//!     .unwrap();
//! collage.save("collage.png").unwrap();
//! ```

pub mod batch;
pub mod candidate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod cover;
pub mod export;
pub mod geometry;
pub mod heal;
pub mod label;
pub mod layout;
pub mod progress;
pub mod trim;

// Re-exports for convenience
pub use batch::{
    discover_folders, extract_product_code, output_name, select, sequence_label, BatchEngine,
    BatchError, BatchOptions, BatchSummary, CancelToken, FilterMode, FolderBatchItem,
    FolderStatus, SequenceCounter, Selection, Tier,
};
pub use candidate::{CandidateImage, CandidateInfo, SourceImage};
pub use classify::{
    CaptionGenerator, Classification, ClassifyError, DefaultClassifier, GeminiClient,
    ImageClassifier, NoCaptions, RetryPolicy,
};
pub use cli::{exit_codes, BatchArgs, Cli, Commands, ComposeArgs, CompositionArgs, CoverArgs, TrimArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use cover::CoverGenerator;
pub use export::{
    is_exportable, write_bundle, CaptionSettings, ExportAssembler, ExportBundle, ExportError,
    ExportGroup, ExportWriter, ItemArtifact, SummaryRecord,
};
pub use geometry::{PixelRect, RenderRect};
pub use heal::{DefectBox, HealOptions, RegionHealer};
pub use label::{LabelAnchor, LabelError, LabelFont, TextLabelRenderer};
pub use layout::{encode_png, CompositionConfig, Compositor, LayoutError, LayoutKind};
pub use progress::{
    OutputMode, ProcessingStage, ProgressCallback, ProgressTracker, SilentProgress,
};
pub use trim::{ContentTrimmer, TrimOptions};
