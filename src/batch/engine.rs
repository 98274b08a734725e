//! Batch Selection Engine
//!
//! Drives every pending folder through `Pending -> Analyzing -> Generating ->
//! {Done | Skipped | Failed}`. The engine owns the item list and the sequence
//! counter and is their only writer; regeneration takes `&mut self`, so it can
//! never overlap a running batch.
//!
//! # Algorithm (per folder)
//!
//! 1. Decode and classify up to `scan_limit` files, one call at a time,
//!    pausing after each remote call
//! 2. Tier the candidates and pick a layout
//! 3. Label from the sequence counter, compose, advance the counter on success
//!
//! Errors stay on the folder's item; the loop always moves on.

use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::naming::{extract_product_code, output_name, sequence_label};
use super::select::{select, Selection};
use super::sequence::SequenceCounter;
use super::types::{
    BatchError, BatchOptions, BatchSummary, FolderBatchItem, FolderStatus, Result,
};
use crate::candidate::{CandidateImage, CandidateInfo, SourceImage};
use crate::classify::{classify_or_fail_safe, ImageClassifier};
use crate::layout::{Compositor, LayoutKind};
use crate::progress::ProgressCallback;

/// Cooperative cancellation flag, checked once per folder
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Batch pipeline driver
pub struct BatchEngine {
    items: Vec<FolderBatchItem>,
    counter: SequenceCounter,
    options: BatchOptions,
    classifier: Box<dyn ImageClassifier>,
    compositor: Compositor,
}

impl BatchEngine {
    pub fn new(
        items: Vec<FolderBatchItem>,
        counter: SequenceCounter,
        options: BatchOptions,
        classifier: Box<dyn ImageClassifier>,
        compositor: Compositor,
    ) -> Self {
        Self {
            items,
            counter,
            options,
            classifier,
            compositor,
        }
    }

    pub fn items(&self) -> &[FolderBatchItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<FolderBatchItem> {
        self.items
    }

    pub fn counter(&self) -> &SequenceCounter {
        &self.counter
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process every pending folder in order
    pub fn run(&mut self, cancel: &CancelToken, progress: &dyn ProgressCallback) -> BatchSummary {
        let total = self.items.len();
        info!(
            folders = total,
            classifier = self.classifier.name(),
            mode = %self.options.filter_mode,
            "Starting batch"
        );

        for index in 0..total {
            if cancel.is_cancelled() {
                info!(remaining = total - index, "Batch cancelled");
                break;
            }
            if self.items[index].status != FolderStatus::Pending {
                continue;
            }

            let folder = self.items[index].folder.clone();
            progress.on_step_start(&folder);
            if let Err(e) = self.process_folder(index, progress) {
                warn!(folder = %folder, error = %e, "Folder left in unexpected state");
            }

            let item = &self.items[index];
            progress.on_step_complete(&folder, item.status, &item.message);
            progress.on_step_progress(index + 1, total);
        }

        self.summary()
    }

    /// Outcome counts over all items
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.items.len(),
            ..BatchSummary::default()
        };
        for item in &self.items {
            match item.status {
                FolderStatus::Done => summary.done += 1,
                FolderStatus::Skipped => summary.skipped += 1,
                FolderStatus::Failed => summary.failed += 1,
                _ => summary.cancelled += 1,
            }
        }
        summary
    }

    /// Re-render a Done item with a new label, reusing its chosen images.
    ///
    /// Returns the item's resulting status (Done, or Failed with the message).
    pub fn regenerate(&mut self, index: usize, label: &str) -> Result<FolderStatus> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(BatchError::IndexOutOfRange { index, len })?;
        if item.status != FolderStatus::Done {
            return Err(BatchError::InvalidState {
                folder: item.folder.clone(),
                from: item.status,
                to: FolderStatus::Generating,
            });
        }
        let Some(layout) = item.layout else {
            return Err(BatchError::InvalidState {
                folder: item.folder.clone(),
                from: item.status,
                to: FolderStatus::Generating,
            });
        };

        item.transition(FolderStatus::Generating, format!("Regenerating as {label}"))?;
        let rendered = render(&self.compositor, &self.options, &item.chosen, layout, label);

        let item = &mut self.items[index];
        match rendered {
            Ok(bitmap) => {
                let code = item.product_code.clone().unwrap_or_default();
                item.output_name = Some(output_name(&code, label));
                item.label = Some(label.to_string());
                item.result = Some(bitmap);
                item.transition(FolderStatus::Done, format!("{layout} - {label}"))?;
                info!(folder = %item.folder, label, "Regenerated");
            }
            Err(e) => {
                item.result = None;
                item.error = Some(e.to_string());
                item.transition(FolderStatus::Failed, format!("Regeneration failed: {e}"))?;
                warn!(folder = %item.folder, error = %e, "Regeneration failed");
            }
        }
        Ok(item.status)
    }

    fn process_folder(&mut self, index: usize, progress: &dyn ProgressCallback) -> Result<()> {
        self.items[index].transition(FolderStatus::Analyzing, "Analyzing images")?;

        let files = self.items[index].files.clone();
        let candidates = self.analyze(&files, progress);
        self.items[index].candidates = candidates.iter().map(CandidateInfo::from).collect();
        let selection = select(&candidates, self.options.filter_mode);

        let (layout, indices, single, dual) = match selection {
            Selection::Compose {
                layout,
                indices,
                single,
                dual,
            } => (layout, indices, single, dual),
            Selection::Insufficient { single, dual } => {
                let message = Selection::Insufficient { single, dual }.describe();
                let item = &mut self.items[index];
                item.single_count = single;
                item.dual_count = dual;
                item.error = Some(message.clone());
                info!(folder = %item.folder, single, dual, "Folder skipped");
                return item.transition(FolderStatus::Skipped, message);
            }
        };

        let mut chosen: Vec<Option<CandidateImage>> = candidates.into_iter().map(Some).collect();
        let chosen: Vec<CandidateImage> = indices.iter().filter_map(|&i| chosen[i].take()).collect();

        let label = sequence_label(&self.options.label_prefix, self.counter.current());
        let item = &mut self.items[index];
        let code = chosen
            .first()
            .map(|c| extract_product_code(c.file_name()))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| item.folder.clone());

        item.single_count = single;
        item.dual_count = dual;
        item.layout = Some(layout);
        item.product_code = Some(code);
        item.transition(FolderStatus::Generating, format!("Composing {layout}"))?;

        match render(&self.compositor, &self.options, &chosen, layout, &label) {
            Ok(bitmap) => {
                let code = item.product_code.clone().unwrap_or_default();
                item.output_name = Some(output_name(&code, &label));
                item.result = Some(bitmap);
                item.chosen = chosen;
                item.transition(FolderStatus::Done, format!("{layout} - {label}"))?;
                info!(folder = %item.folder, %layout, label = %label, "Folder done");
                item.label = Some(label);
                self.counter.advance();
            }
            Err(e) => {
                item.error = Some(e.to_string());
                item.transition(FolderStatus::Failed, format!("Composition failed: {e}"))?;
                warn!(folder = %item.folder, error = %e, "Folder failed");
            }
        }
        Ok(())
    }

    /// Decode and classify the scan window of a folder, strictly one file at a time
    fn analyze(
        &self,
        files: &[std::path::PathBuf],
        progress: &dyn ProgressCallback,
    ) -> Vec<CandidateImage> {
        let mut candidates = Vec::new();
        for path in files.iter().take(self.options.scan_limit) {
            let source = match SourceImage::open(path) {
                Ok(source) => source,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping undecodable image");
                    continue;
                }
            };

            let analysis =
                classify_or_fail_safe(self.classifier.as_ref(), &self.options.retry, &source);
            let message = format!(
                "{}: subjects={} multi_panel={} defect={}",
                source.file_name,
                analysis.subject_count,
                analysis.is_multi_panel,
                analysis.defect.is_usable()
            );
            debug!("{message}");
            progress.on_debug(&message);
            candidates.push(CandidateImage::new(source, analysis));

            if self.classifier.is_remote() && !self.options.call_delay.is_zero() {
                std::thread::sleep(self.options.call_delay);
            }
        }
        candidates
    }
}

/// Compose with the set label as the global title
fn render(
    compositor: &Compositor,
    options: &BatchOptions,
    chosen: &[CandidateImage],
    layout: LayoutKind,
    label: &str,
) -> std::result::Result<RgbaImage, crate::layout::LayoutError> {
    let config = options.composition.with_global_label(label);
    compositor.compose(chosen, layout, &config)
}
