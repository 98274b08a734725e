//! Progress tracking for batch runs
//!
//! The engine reports through [`ProgressCallback`]; the CLI decides how to
//! display it. [`ProgressTracker`] prints a per-folder line and a summary block.

use std::fmt;
use std::time::Instant;

use crate::batch::{BatchSummary, FolderStatus};

/// Batch phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Scanning input folders
    #[default]
    Discovering,
    /// Classifying images
    Analyzing,
    /// Composing collages
    Generating,
    /// Writing export artifacts
    Exporting,
    /// Finished
    Completed,
}

impl ProcessingStage {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Discovering => "Discovering",
            ProcessingStage::Analyzing => "Analyzing",
            ProcessingStage::Generating => "Generating",
            ProcessingStage::Exporting => "Exporting",
            ProcessingStage::Completed => "Completed",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress events emitted by the batch engine
pub trait ProgressCallback: Send + Sync {
    /// A folder started processing
    fn on_step_start(&self, _step: &str) {}

    /// `current` of `total` folders have finished
    fn on_step_progress(&self, _current: usize, _total: usize) {}

    /// A folder finished with `status`
    fn on_step_complete(&self, _step: &str, _status: FolderStatus, _message: &str) {}

    /// Fine-grained detail (per image)
    fn on_debug(&self, _message: &str) {}
}

/// Callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Per-folder results
    #[default]
    Normal,
    /// Plus per-image detail
    Verbose,
}

impl OutputMode {
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            _ => OutputMode::Verbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, _) => true,
            _ => false,
        }
    }
}

/// Progress bar width in characters
const PROGRESS_BAR_WIDTH: usize = 40;

/// Build a text progress bar
pub fn build_progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = (percent as usize * PROGRESS_BAR_WIDTH) / 100;
    let empty = PROGRESS_BAR_WIDTH - filled;
    format!("[{}{}]", "=".repeat(filled), "-".repeat(empty))
}

/// Console progress for a batch run
#[derive(Debug)]
pub struct ProgressTracker {
    pub total_folders: usize,
    pub finished: usize,
    pub stage: ProcessingStage,
    start_time: Instant,
    output_mode: OutputMode,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(0, OutputMode::Normal)
    }
}

impl ProgressTracker {
    pub fn new(total_folders: usize, output_mode: OutputMode) -> Self {
        Self {
            total_folders,
            finished: 0,
            stage: ProcessingStage::Discovering,
            start_time: Instant::now(),
            output_mode,
        }
    }

    pub fn set_stage(&mut self, stage: ProcessingStage) {
        self.stage = stage;
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("  Stage: {}", self.stage);
        }
    }

    /// Record one finished folder and print its result line
    pub fn folder_finished(&mut self, folder: &str, status: FolderStatus, message: &str) {
        self.finished += 1;
        if self.output_mode.should_show(OutputMode::Normal) {
            println!("{}", Self::format_line(self.finished, self.total_folders, folder, status, message));
        }
    }

    /// "[3/10] Skipped   look_a: Not enough images (...)"
    pub fn format_line(
        index: usize,
        total: usize,
        folder: &str,
        status: FolderStatus,
        message: &str,
    ) -> String {
        format!("[{index}/{total}] {:<9} {folder}: {message}", status.name())
    }

    pub fn percent(&self) -> u8 {
        if self.total_folders == 0 {
            return 100;
        }
        ((self.finished * 100) / self.total_folders).min(100) as u8
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print the final summary block
    pub fn print_summary(summary: &BatchSummary, elapsed_secs: f64) {
        println!();
        println!("{}", "=".repeat(60));
        println!("Batch Summary");
        println!("{}", "=".repeat(60));
        println!("  Folders:   {}", summary.total);
        println!("  Done:      {}", summary.done);
        println!("  Skipped:   {}", summary.skipped);
        println!("  Failed:    {}", summary.failed);
        if summary.cancelled > 0 {
            println!("  Cancelled: {}", summary.cancelled);
        }
        println!("  Elapsed:   {elapsed_secs:.1}s");
        println!("{}", "=".repeat(60));
    }
}
