//! Classification and captioning collaborators
//!
//! The batch engine talks to the outside world only through two traits:
//! [`ImageClassifier`] (subject count, multi-panel flag, defect box per image)
//! and [`CaptionGenerator`] (short caption hooks). Both are injected, so tests
//! run against in-memory fakes.
//!
//! # Features
//!
//! - [`DefaultClassifier`]: deterministic single-subject result, no network
//! - [`GeminiClient`]: REST backend for both traits
//! - [`RetryPolicy`]: bounded retry with capped exponential backoff
//! - Response normalization that tolerates missing fields and code fences

mod backend;
mod gemini;
mod parse;
mod retry;
mod types;

pub use backend::{
    classify_or_fail_safe, fetch_hooks, CaptionGenerator, DefaultClassifier, ImageClassifier,
    NoCaptions,
};
pub use gemini::GeminiClient;
pub use parse::{parse_classification, parse_hooks, strip_code_fences};
pub use retry::RetryPolicy;
pub use types::{
    Classification, ClassifyError, Result, API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_HOOK_COUNT,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
