//! Batch module
//!
//! Folder discovery, per-folder candidate selection and the pipeline driver.
//!
//! # Example
//!
//! ```rust,no_run
//! use listing_collage::{
//!     discover_folders, BatchEngine, BatchOptions, CancelToken, Compositor, DefaultClassifier,
//!     SequenceCounter, SilentProgress,
//! };
//! use std::path::Path;
//!
//! let items = discover_folders(Path::new("./input")).unwrap();
//! let mut engine = BatchEngine::new(
//!     items,
//!     SequenceCounter::new(1, 4).unwrap(),
//!     BatchOptions::default(),
//!     Box::new(DefaultClassifier),
//!     Compositor::default(),
//! );
//! let summary = engine.run(&CancelToken::new(), &SilentProgress);
//! println!("{} done, {} skipped", summary.done, summary.skipped);
//! ```

mod discover;
mod engine;
mod naming;
mod select;
mod sequence;
mod types;

pub use discover::{discover_folders, is_image_file};
pub use engine::{BatchEngine, CancelToken};
pub use naming::{alphanumeric, extract_product_code, output_name, safe_filename, sequence_label};
pub use select::{select, tier_of, Selection, Tier};
pub use sequence::SequenceCounter;
pub use types::{
    BatchError, BatchOptions, BatchOptionsBuilder, BatchSummary, FilterMode, FolderBatchItem,
    FolderStatus, Result, DEFAULT_CALL_DELAY, DEFAULT_LABEL_PREFIX, DEFAULT_SCAN_LIMIT,
    IMAGE_EXTENSIONS,
};
