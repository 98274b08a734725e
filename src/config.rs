//! Configuration file support
//!
//! Settings come from a TOML file and can be overridden from the command line.
//!
//! # Lookup order
//!
//! 1. `--config <path>`
//! 2. `./collage.toml`
//! 3. `<config dir>/listing-collage/config.toml`
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```toml
//! [composition]
//! output_width = 2160
//! output_height = 3840
//! gap_px = 12
//! label_mode = "center"
//!
//! [batch]
//! scan_limit = 20
//! filter_mode = "smart"
//! sequence_start = 1
//! sequence_end = 4
//!
//! [export]
//! product_type = "Linen dress"
//! occasion = "for summer"
//!
//! [classifier]
//! enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::batch::{
    BatchOptions, FilterMode, SequenceCounter, DEFAULT_CALL_DELAY, DEFAULT_LABEL_PREFIX,
    DEFAULT_SCAN_LIMIT,
};
use crate::classify::{API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_HOOK_COUNT, DEFAULT_MODEL};
use crate::cover::CoverGenerator;
use crate::export::{CaptionSettings, DEFAULT_HASHTAGS};
use crate::label::LabelAnchor;
use crate::layout::{
    CompositionConfig, DEFAULT_BACKGROUND, DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH,
};

/// Local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "collage.toml";

/// Directory under the user config dir
pub const USER_CONFIG_DIR: &str = "listing-collage";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================
// Sections
// ============================================================

/// `[composition]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSection {
    pub output_width: u32,
    pub output_height: u32,
    pub gap_px: u32,
    pub background_color: [u8; 3],
    pub heal_defects: bool,
    pub trim_borders: bool,
    pub label_mode: LabelAnchor,
    /// TrueType font for labels; system fonts are searched when unset
    pub font_path: Option<PathBuf>,
}

impl Default for CompositionSection {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            gap_px: 0,
            background_color: DEFAULT_BACKGROUND,
            heal_defects: true,
            trim_borders: true,
            label_mode: LabelAnchor::default(),
            font_path: None,
        }
    }
}

/// `[batch]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub scan_limit: usize,
    pub call_delay_ms: u64,
    pub filter_mode: FilterMode,
    pub label_prefix: String,
    pub sequence_start: u32,
    pub sequence_end: u32,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
            call_delay_ms: DEFAULT_CALL_DELAY.as_millis() as u64,
            filter_mode: FilterMode::default(),
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            sequence_start: 1,
            sequence_end: 4,
        }
    }
}

/// `[export]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub title: Option<String>,
    pub product_type: String,
    pub occasion: String,
    pub hashtags: String,
    pub hook_count: usize,
    /// Cover size in pixels
    pub cover_width: u32,
    pub cover_height: u32,
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            title: None,
            product_type: String::new(),
            occasion: String::new(),
            hashtags: DEFAULT_HASHTAGS.to_string(),
            hook_count: DEFAULT_HOOK_COUNT,
            cover_width: DEFAULT_OUTPUT_WIDTH,
            cover_height: DEFAULT_OUTPUT_HEIGHT,
            output_dir: None,
        }
    }
}

/// `[classifier]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    /// Use the remote service when a key is available
    pub enabled: bool,
    /// Falls back to the environment when unset
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

// ============================================================
// Config
// ============================================================

/// Complete configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub composition: CompositionSection,
    pub batch: BatchSection,
    pub export: ExportSection,
    pub classifier: ClassifierSection,
}

impl Config {
    /// Load from the first existing default location, or defaults if none exists
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.is_file() {
                debug!(path = %path.display(), "Loading config");
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(USER_CONFIG_DIR).join("config.toml"));
        }
        paths
    }

    /// Apply explicitly given CLI values on top of this config
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Self {
        let mut merged = self.clone();

        let comp = &mut merged.composition;
        if let Some(w) = cli.output_width {
            comp.output_width = w;
        }
        if let Some(h) = cli.output_height {
            comp.output_height = h;
        }
        if let Some(gap) = cli.gap_px {
            comp.gap_px = gap;
        }
        if let Some(heal) = cli.heal_defects {
            comp.heal_defects = heal;
        }
        if let Some(trim) = cli.trim_borders {
            comp.trim_borders = trim;
        }
        if let Some(mode) = cli.label_mode {
            comp.label_mode = mode;
        }
        if cli.font_path.is_some() {
            comp.font_path = cli.font_path.clone();
        }

        let batch = &mut merged.batch;
        if let Some(limit) = cli.scan_limit {
            batch.scan_limit = limit;
        }
        if let Some(ms) = cli.call_delay_ms {
            batch.call_delay_ms = ms;
        }
        if let Some(mode) = cli.filter_mode {
            batch.filter_mode = mode;
        }
        if let Some(prefix) = &cli.label_prefix {
            batch.label_prefix = prefix.clone();
        }
        if let Some(start) = cli.sequence_start {
            batch.sequence_start = start;
        }
        if let Some(end) = cli.sequence_end {
            batch.sequence_end = end;
        }

        let export = &mut merged.export;
        if cli.title.is_some() {
            export.title = cli.title.clone();
        }
        if let Some(product) = &cli.product_type {
            export.product_type = product.clone();
        }
        if let Some(occasion) = &cli.occasion {
            export.occasion = occasion.clone();
        }
        if let Some(tags) = &cli.hashtags {
            export.hashtags = tags.clone();
        }
        if cli.output_dir.is_some() {
            export.output_dir = cli.output_dir.clone();
        }

        if let Some(enabled) = cli.classifier_enabled {
            merged.classifier.enabled = enabled;
        }

        merged
    }

    /// Composition settings for the compositor
    pub fn composition_config(&self) -> CompositionConfig {
        let c = &self.composition;
        CompositionConfig::builder()
            .output_size(c.output_width, c.output_height)
            .gap(c.gap_px)
            .background_color(c.background_color)
            .heal_defects(c.heal_defects)
            .trim_borders(c.trim_borders)
            .label_mode(c.label_mode)
            .build()
    }

    /// Options for the batch engine
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::builder()
            .scan_limit(self.batch.scan_limit)
            .call_delay(Duration::from_millis(self.batch.call_delay_ms))
            .filter_mode(self.batch.filter_mode)
            .label_prefix(self.batch.label_prefix.clone())
            .composition(self.composition_config())
            .build()
    }

    /// Sequence counter for the configured range
    pub fn sequence(&self) -> crate::batch::Result<SequenceCounter> {
        SequenceCounter::new(self.batch.sequence_start, self.batch.sequence_end)
    }

    /// Caption inputs for the export assembler
    pub fn caption_settings(&self) -> CaptionSettings {
        CaptionSettings {
            title: self.export.title.clone(),
            product_type: self.export.product_type.clone(),
            occasion: self.export.occasion.clone(),
            hashtags: self.export.hashtags.clone(),
        }
    }

    /// Cover generator for exported items
    pub fn cover_generator(&self) -> crate::layout::Result<CoverGenerator> {
        Ok(
            CoverGenerator::with_size(self.export.cover_width, self.export.cover_height)?
                .with_background(self.composition.background_color),
        )
    }

    /// API key from the file, else from the environment
    pub fn api_key(&self) -> Option<String> {
        self.classifier
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

// ============================================================
// CLI Overrides
// ============================================================

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_width: Option<u32>,
    pub output_height: Option<u32>,
    pub gap_px: Option<u32>,
    pub heal_defects: Option<bool>,
    pub trim_borders: Option<bool>,
    pub label_mode: Option<LabelAnchor>,
    pub font_path: Option<PathBuf>,
    pub scan_limit: Option<usize>,
    pub call_delay_ms: Option<u64>,
    pub filter_mode: Option<FilterMode>,
    pub label_prefix: Option<String>,
    pub sequence_start: Option<u32>,
    pub sequence_end: Option<u32>,
    pub title: Option<String>,
    pub product_type: Option<String>,
    pub occasion: Option<String>,
    pub hashtags: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub classifier_enabled: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.composition.output_width, 2160);
        assert_eq!(config.composition.output_height, 3840);
        assert_eq!(config.batch.scan_limit, 20);
        assert_eq!(config.batch.call_delay_ms, 2000);
        assert_eq!(config.batch.filter_mode, FilterMode::Smart);
        assert_eq!(config.export.hashtags, "#fashion #trending #ootd");
        assert!(config.classifier.enabled);
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[composition]\ngap_px = 8\nlabel_mode = \"corner\"\n\n[batch]\nfilter_mode = \"strict\"\nsequence_end = 6"
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.composition.gap_px, 8);
        assert_eq!(config.composition.label_mode, LabelAnchor::Corner);
        assert_eq!(config.composition.output_width, 2160);
        assert_eq!(config.batch.filter_mode, FilterMode::Strict);
        assert_eq!(config.batch.sequence_end, 6);
        assert_eq!(config.sequence().unwrap().cycle_len(), 6);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[batch\nscan_limit = ").unwrap();
        assert!(matches!(
            Config::load_from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load_from_path(Path::new("/nonexistent/collage.toml")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_cli_wins() {
        let mut config = Config::default();
        config.batch.label_prefix = "Look".into();
        config.composition.gap_px = 4;

        let overrides = CliOverrides {
            gap_px: Some(16),
            filter_mode: Some(FilterMode::Strict),
            title: Some("Drop".into()),
            classifier_enabled: Some(false),
            ..CliOverrides::new()
        };
        let merged = config.merge_with_cli(&overrides);
        assert_eq!(merged.composition.gap_px, 16);
        assert_eq!(merged.batch.filter_mode, FilterMode::Strict);
        assert_eq!(merged.batch.label_prefix, "Look");
        assert_eq!(merged.export.title.as_deref(), Some("Drop"));
        assert!(!merged.classifier.enabled);
    }

    #[test]
    fn test_derived_settings() {
        let mut config = Config::default();
        config.batch.call_delay_ms = 0;
        config.export.product_type = "Coat".into();

        let options = config.batch_options();
        assert_eq!(options.call_delay, Duration::ZERO);
        assert_eq!(options.composition.output_width, 2160);
        assert_eq!(config.caption_settings().product_type, "Coat");
        assert_eq!(config.cover_generator().unwrap().dimensions(), (2160, 3840));
    }

    #[test]
    fn test_zero_cover_size_rejected() {
        let mut config = Config::default();
        config.export.cover_width = 0;
        assert!(config.cover_generator().is_err());
    }

    #[test]
    fn test_invalid_sequence_range() {
        let mut config = Config::default();
        config.batch.sequence_start = 5;
        config.batch.sequence_end = 2;
        assert!(config.sequence().is_err());
    }

    #[test]
    fn test_explicit_api_key() {
        let mut config = Config::default();
        config.classifier.api_key = Some("  abc  ".into());
        assert_eq!(config.api_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_toml_roundtrip_keeps_sections() {
        let text = Config::default().to_toml();
        assert!(text.contains("[composition]"));
        assert!(text.contains("[classifier]"));
    }
}
