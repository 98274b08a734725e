//! listing-collage - Collage and cover generator for product photo folders
//!
//! CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use listing_collage::{
    discover_folders, exit_codes,
    // Classification
    classify::{fetch_hooks, API_KEY_ENV},
    CaptionGenerator, DefaultClassifier, GeminiClient, ImageClassifier, NoCaptions, RetryPolicy,
    // CLI
    BatchArgs, Cli, Commands, ComposeArgs, CompositionArgs, CoverArgs, TrimArgs,
    // Config
    CliOverrides, Config,
    // Pipeline
    BatchEngine, CancelToken, CandidateImage, Compositor, ContentTrimmer, CoverGenerator,
    LabelAnchor, LabelFont, LayoutKind, SourceImage, TextLabelRenderer,
    // Export
    is_exportable, ExportAssembler, ExportWriter,
    // Progress tracking
    FolderStatus, OutputMode, ProgressCallback, ProgressTracker,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{info, warn, Level};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref());
    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_verbosity(cli.verbose)
    };

    let result = match cli.command {
        Commands::Compose(args) => run_compose(&args, &config),
        Commands::Cover(args) => run_cover(&args, &config),
        Commands::Trim(args) => run_trim(&args),
        Commands::Batch(args) => run_batch(&args, &config, mode),
        Commands::Info => run_info(&config),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

/// warn by default, info with -v, debug with -vv; errors only with --quiet
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit config file, else the default lookup; failures fall back to defaults
fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(config_path) => match Config::load_from_path(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                Config::default()
            }
        },
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config file: {}", e);
            Config::default()
        }),
    }
}

// ============ Progress Callback Implementation ============

/// Progress bar across folders with one result line per folder
struct BatchProgress {
    bar: ProgressBar,
    total: usize,
    finished: AtomicUsize,
    mode: OutputMode,
}

impl BatchProgress {
    fn new(total: usize, mode: OutputMode) -> Self {
        let bar = if mode == OutputMode::Quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}",
            ) {
                bar.set_style(style);
            }
            bar
        };
        Self {
            bar,
            total,
            finished: AtomicUsize::new(0),
            mode,
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for BatchProgress {
    fn on_step_start(&self, step: &str) {
        self.bar.set_message(step.to_string());
    }

    fn on_step_progress(&self, current: usize, _total: usize) {
        self.bar.set_position(current as u64);
    }

    fn on_step_complete(&self, step: &str, status: FolderStatus, message: &str) {
        let index = self.finished.fetch_add(1, Ordering::SeqCst) + 1;
        if self.mode.should_show(OutputMode::Normal) {
            let line = ProgressTracker::format_line(index, self.total, step, status, message);
            self.bar.suspend(|| println!("{}", line));
        }
    }

    fn on_debug(&self, message: &str) {
        if self.mode.should_show(OutputMode::Verbose) {
            self.bar.suspend(|| println!("    {}", message));
        }
    }
}

// ============ Helper Functions ============

fn composition_overrides(args: &CompositionArgs, overrides: &mut CliOverrides) {
    overrides.output_width = args.width;
    overrides.output_height = args.height;
    overrides.gap_px = args.gap;
    overrides.label_mode = args.label_mode;
    overrides.font_path = args.font.clone();
    if args.no_heal {
        overrides.heal_defects = Some(false);
    }
    if args.no_trim {
        overrides.trim_borders = Some(false);
    }
}

/// Label renderer with the configured or a system font; labels are skipped without one
fn label_renderer(config: &Config) -> TextLabelRenderer {
    match LabelFont::discover(config.composition.font_path.as_deref()) {
        Ok(font) => {
            info!(font = %font.path().display(), "Using label font");
            TextLabelRenderer::new(Some(font))
        }
        Err(e) => {
            warn!(error = %e, "No label font; labels will be skipped");
            TextLabelRenderer::new(None)
        }
    }
}

fn require_input(path: &Path) {
    if !path.exists() {
        eprintln!("Error: Input path does not exist: {}", path.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }
}

/// Remote client when enabled and a key is available
fn remote_client(config: &Config) -> Option<GeminiClient> {
    if !config.classifier.enabled {
        info!("Classification disabled; every image counts as single subject");
        return None;
    }
    let Some(key) = config.api_key() else {
        warn!("No API key ({} unset); using default classifier", API_KEY_ENV);
        return None;
    };
    match GeminiClient::new(key) {
        Ok(client) => Some(
            client
                .with_model(config.classifier.model.clone())
                .with_endpoint(config.classifier.endpoint.clone()),
        ),
        Err(e) => {
            warn!(error = %e, "Classifier unavailable; using default classifier");
            None
        }
    }
}

// ============ Compose Command ============

fn run_compose(args: &ComposeArgs, config: &Config) -> Result<()> {
    for file in &args.files {
        require_input(file);
    }

    let mut overrides = CliOverrides::new();
    composition_overrides(&args.composition, &mut overrides);
    if !args.captions.is_empty() && args.label.is_none() && overrides.label_mode.is_none() {
        overrides.label_mode = Some(LabelAnchor::Corner);
    }
    let merged = config.merge_with_cli(&overrides);

    let mut images = Vec::with_capacity(args.files.len());
    for (i, path) in args.files.iter().enumerate() {
        let source = SourceImage::open(path)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        let mut candidate = CandidateImage::plain(source);
        if let Some(caption) = args.captions.get(i) {
            candidate = candidate.with_caption(caption.clone());
        }
        images.push(candidate);
    }

    let mut composition = merged.composition_config();
    if let Some(label) = &args.label {
        composition = composition.with_global_label(label.clone());
    }

    let compositor = Compositor::new(label_renderer(&merged));
    let png = compositor.compose_png(&images, args.layout, &composition)?;
    std::fs::write(&args.output, png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "{} collage ({}x{}) written to {}",
        args.layout,
        composition.output_width,
        composition.output_height,
        args.output.display()
    );
    Ok(())
}

// ============ Cover Command ============

fn run_cover(args: &CoverArgs, config: &Config) -> Result<()> {
    require_input(&args.input);

    let generator = CoverGenerator::with_size(
        args.width.unwrap_or(config.export.cover_width),
        args.height.unwrap_or(config.export.cover_height),
    )?
    .with_background(config.composition.background_color);

    let source = SourceImage::open(&args.input)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    let png = generator.generate_png(&source.bitmap)?;
    std::fs::write(&args.output, png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let (w, h) = generator.dimensions();
    println!("Cover ({}x{}) written to {}", w, h, args.output.display());
    Ok(())
}

// ============ Trim Command ============

fn run_trim(args: &TrimArgs) -> Result<()> {
    require_input(&args.input);

    let source = SourceImage::open(&args.input)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    let trimmer = ContentTrimmer::default();
    let trimmed = trimmer.trim(&source.bitmap);

    let (before_w, before_h) = source.dimensions();
    trimmed
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Trimmed {}x{} -> {}x{}, written to {}",
        before_w,
        before_h,
        trimmed.width(),
        trimmed.height(),
        args.output.display()
    );
    Ok(())
}

// ============ Batch Command ============

fn create_batch_overrides(args: &BatchArgs) -> CliOverrides {
    let mut overrides = CliOverrides::new();
    composition_overrides(&args.composition, &mut overrides);

    overrides.filter_mode = args.mode;
    overrides.sequence_start = args.start;
    overrides.sequence_end = args.end;
    overrides.label_prefix = args.prefix.clone();
    overrides.scan_limit = args.scan_limit;
    overrides.call_delay_ms = args.delay_ms;
    overrides.title = args.title.clone();
    overrides.product_type = args.product_type.clone();
    overrides.occasion = args.occasion.clone();
    overrides.hashtags = args.hashtags.clone();
    overrides.output_dir = args.output.clone();
    if args.no_ai {
        overrides.classifier_enabled = Some(false);
    }

    overrides
}

fn run_batch(args: &BatchArgs, config: &Config, mode: OutputMode) -> Result<()> {
    let start_time = Instant::now();
    require_input(&args.input);

    let merged = config.merge_with_cli(&create_batch_overrides(args));
    let counter = merged.sequence()?;

    let items = discover_folders(&args.input)?;
    if items.is_empty() {
        eprintln!("Error: No image folders found under {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let client = remote_client(&merged);
    let out_dir = merged
        .export
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    if args.dry_run {
        print_execution_plan(args, &merged, items.len(), client.is_some(), &out_dir);
        return Ok(());
    }

    let classifier: Box<dyn ImageClassifier> = match &client {
        Some(client) => Box::new(client.clone()),
        None => Box::new(DefaultClassifier),
    };
    let mut engine = BatchEngine::new(
        items,
        counter,
        merged.batch_options(),
        classifier,
        Compositor::new(label_renderer(&merged)),
    );

    let progress = BatchProgress::new(engine.items().len(), mode);
    let summary = engine.run(&CancelToken::new(), &progress);
    progress.finish();

    let items = engine.into_items();
    if !items.iter().any(is_exportable) {
        if mode != OutputMode::Quiet {
            ProgressTracker::print_summary(&summary, start_time.elapsed().as_secs_f64());
        }
        eprintln!("Error: No folder produced a collage; nothing exported");
        std::process::exit(exit_codes::NOTHING_EXPORTED);
    }

    let captioner: &dyn CaptionGenerator = match &client {
        Some(client) => client as &dyn CaptionGenerator,
        None => &NoCaptions,
    };
    let hooks = fetch_hooks(
        captioner,
        &RetryPolicy::hooks(),
        &merged.export.product_type,
        &merged.export.occasion,
        merged.export.hook_count,
    );

    let assembler = ExportAssembler::new(merged.caption_settings(), merged.cover_generator()?);
    std::fs::create_dir_all(&out_dir)?;
    let mut writer = ExportWriter::create(&out_dir, chrono::Local::now().date_naive())?;
    let records = assembler.assemble_each(
        &items,
        &hooks,
        counter.cycle_len(),
        (counter.start(), counter.end()),
        &merged.batch.label_prefix,
        |group| writer.write_group(&group),
    )?;
    let groups = writer.groups_written();
    let root = writer.finish(&records)?;

    if mode != OutputMode::Quiet {
        ProgressTracker::print_summary(&summary, start_time.elapsed().as_secs_f64());
        println!(
            "Exported {} item(s) in {} group(s) to {}",
            records.len(),
            groups,
            root.display()
        );
    }
    Ok(())
}

/// Print execution plan for dry-run mode
fn print_execution_plan(
    args: &BatchArgs,
    config: &Config,
    folders: usize,
    remote: bool,
    out_dir: &Path,
) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", args.input.display());
    println!("Output: {}", out_dir.display());
    println!("Folders to process: {}", folders);
    println!();
    println!("Batch:");
    println!("  Scan limit: {} files per folder", config.batch.scan_limit);
    println!("  Filter mode: {}", config.batch.filter_mode);
    println!(
        "  Sequence: {} {}..{}",
        config.batch.label_prefix, config.batch.sequence_start, config.batch.sequence_end
    );
    println!(
        "  Classifier: {}",
        if remote { "remote" } else { "default (single subject)" }
    );
    println!();
    println!("Composition:");
    let c = &config.composition;
    println!("  Size: {}x{}", c.output_width, c.output_height);
    println!("  Gap: {}px", c.gap_px);
    println!("  Labels: {}", c.label_mode);
    println!("  Heal defects: {}", if c.heal_defects { "YES" } else { "NO" });
    println!("  Trim borders: {}", if c.trim_borders { "YES" } else { "NO" });
}

// ============ Info Command ============

fn run_info(config: &Config) -> Result<()> {
    println!("listing-collage v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Layouts:");
    for kind in LayoutKind::all() {
        println!("  {:<4} {} image(s)", kind.name(), kind.required_images());
    }

    println!();
    println!("Label Font:");
    match LabelFont::discover(config.composition.font_path.as_deref()) {
        Ok(font) => println!("  {}", font.path().display()),
        Err(_) => println!("  Not found (labels will be skipped)"),
    }

    println!();
    println!("Classifier:");
    println!("  Model: {}", config.classifier.model);
    println!(
        "  API key: {}",
        if config.api_key().is_some() { "set" } else { "not set" }
    );

    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        println!("  {}", path.display());
    }

    Ok(())
}
