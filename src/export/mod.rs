//! Export module
//!
//! Turns the Done items of a batch into a dated archive directory: items are
//! grouped per sequence cycle, each group gets one consolidated caption, and
//! every item contributes its collage plus a cover. `assemble_each` with an
//! `ExportWriter` writes each group before encoding the next.
//!
//! # Example
//!
//! ```rust,no_run
//! use listing_collage::{write_bundle, CaptionSettings, CoverGenerator, ExportAssembler};
//! use std::path::Path;
//!
//! # fn items() -> Vec<listing_collage::FolderBatchItem> { Vec::new() }
//! let assembler = ExportAssembler::new(CaptionSettings::default(), CoverGenerator::default());
//! let bundle = assembler.assemble(&items(), &[], 4, (1, 4), "Set").unwrap();
//! let today = chrono::Local::now().date_naive();
//! let root = write_bundle(&bundle, Path::new("./out"), today).unwrap();
//! println!("exported to {}", root.display());
//! ```

mod assembler;
mod caption;
mod types;
mod writer;

pub use assembler::{chunk_sizes, is_exportable, ExportAssembler};
pub use caption::{build_caption, fallback_hook, select_hook};
pub use types::{
    summary_text, CaptionSettings, ExportBundle, ExportError, ExportGroup, ItemArtifact, Result,
    SummaryRecord, CAPTION_FILE, CAPTION_SEPARATOR, CODES_HEADER, DEFAULT_HASHTAGS, SUMMARY_FILE,
};
pub use writer::{export_dir_name, write_bundle, ExportWriter};
