//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::batch::FilterMode;
use crate::label::LabelAnchor;
use crate::layout::LayoutKind;

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
    /// Batch finished but nothing could be exported
    pub const NOTHING_EXPORTED: i32 = 4;
}

/// Collage and cover generator for product photo folders
#[derive(Parser, Debug)]
#[command(name = "listing-collage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (-v info logs, -vv debug logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ./collage.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose explicit images into one collage
    Compose(ComposeArgs),

    /// Generate a full-bleed 9:16 cover from one image
    Cover(CoverArgs),

    /// Trim uniform borders from one image
    Trim(TrimArgs),

    /// Process every image folder under a directory and export the results
    Batch(BatchArgs),

    /// Show version, layouts and config locations
    Info,
}

/// Shared composition flags
#[derive(Args, Debug, Clone, Default)]
pub struct CompositionArgs {
    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Gap between cells and around the edge in pixels
    #[arg(long)]
    pub gap: Option<u32>,

    /// Label anchor: corner or center
    #[arg(long)]
    pub label_mode: Option<LabelAnchor>,

    /// Disable defect healing
    #[arg(long)]
    pub no_heal: bool,

    /// Disable border trimming
    #[arg(long)]
    pub no_trim: bool,

    /// TrueType font for labels
    #[arg(long)]
    pub font: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    /// Source images, in cell order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Layout: 2x1, 1x2, 2x2, 4x1 or 1x1
    #[arg(short, long, default_value = "2x1")]
    pub layout: LayoutKind,

    /// Per-cell caption (repeat once per cell, corner mode)
    #[arg(long = "caption")]
    pub captions: Vec<String>,

    /// Title drawn over the whole collage (center mode)
    #[arg(long)]
    pub label: Option<String>,

    /// Output PNG
    #[arg(short, long, default_value = "collage.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub composition: CompositionArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CoverArgs {
    /// Source image
    pub input: PathBuf,

    /// Output PNG
    #[arg(short, long, default_value = "cover.png")]
    pub output: PathBuf,

    /// Cover width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Cover height in pixels
    #[arg(long)]
    pub height: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct TrimArgs {
    /// Source image
    pub input: PathBuf,

    /// Output PNG
    #[arg(short, long, default_value = "trimmed.png")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Root directory; every folder containing images is one item
    pub input: PathBuf,

    /// Directory receiving the dated export folder
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the classification service (every image counts as single subject)
    #[arg(long)]
    pub no_ai: bool,

    /// Filter mode: strict or smart
    #[arg(long)]
    pub mode: Option<FilterMode>,

    /// First sequence number
    #[arg(long)]
    pub start: Option<u32>,

    /// Last sequence number (wraps back to --start)
    #[arg(long)]
    pub end: Option<u32>,

    /// Sequence label prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Files analyzed per folder
    #[arg(long)]
    pub scan_limit: Option<usize>,

    /// Pause after each classification call in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Caption title line
    #[arg(long)]
    pub title: Option<String>,

    /// Product type for caption hooks
    #[arg(long)]
    pub product_type: Option<String>,

    /// Occasion for caption hooks
    #[arg(long)]
    pub occasion: Option<String>,

    /// Hashtag block
    #[arg(long)]
    pub hashtags: Option<String>,

    /// Show the plan without processing
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub composition: CompositionArgs,
}
