//! Collaborator traits and the credential-less backends

use tracing::{debug, info, warn};

use super::retry::RetryPolicy;
use super::types::{Classification, Result};
use crate::candidate::SourceImage;

/// Per-image classification service
pub trait ImageClassifier: Send + Sync {
    /// Classify one decoded image
    fn classify(&self, image: &SourceImage) -> Result<Classification>;

    /// Backend name for logs
    fn name(&self) -> &str;

    /// Whether calls reach an external service (and need rate limiting)
    fn is_remote(&self) -> bool {
        false
    }
}

/// Short caption ("hook") generation service
pub trait CaptionGenerator: Send + Sync {
    /// Generate up to `count` hooks for a product type and occasion
    fn generate_hooks(&self, product_type: &str, occasion: &str, count: usize)
        -> Result<Vec<String>>;

    fn name(&self) -> &str;
}

/// Deterministic classifier used without credentials or with `--no-ai`:
/// every image is one subject with no defect.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl ImageClassifier for DefaultClassifier {
    fn classify(&self, _image: &SourceImage) -> Result<Classification> {
        Ok(Classification::single_subject())
    }

    fn name(&self) -> &str {
        "default"
    }
}

/// Captioner that never produces hooks; export falls back to a fixed sentence
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCaptions;

impl CaptionGenerator for NoCaptions {
    fn generate_hooks(&self, _: &str, _: &str, _: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Classify with retries; exhausted retries yield "no subject"
pub fn classify_or_fail_safe(
    classifier: &dyn ImageClassifier,
    policy: &RetryPolicy,
    image: &SourceImage,
) -> Classification {
    match policy.run(
        "classify",
        || classifier.classify(image),
        |_| true,
    ) {
        Ok(c) => c.normalized(),
        Err(e) => {
            warn!(
                file = %image.file_name,
                backend = classifier.name(),
                error = %e,
                "Classification failed after retries; treating as no subject"
            );
            Classification::no_subject()
        }
    }
}

/// Fetch hooks, retrying only rate-limit failures. Never fails: errors give an empty list.
pub fn fetch_hooks(
    captioner: &dyn CaptionGenerator,
    policy: &RetryPolicy,
    product_type: &str,
    occasion: &str,
    count: usize,
) -> Vec<String> {
    if product_type.trim().is_empty() && occasion.trim().is_empty() {
        debug!("No product type or occasion; skipping hook generation");
        return Vec::new();
    }
    match policy.run(
        "hooks",
        || captioner.generate_hooks(product_type, occasion, count),
        |e| e.is_rate_limit(),
    ) {
        Ok(mut hooks) => {
            hooks.truncate(count);
            info!(count = hooks.len(), backend = captioner.name(), "Generated hooks");
            hooks
        }
        Err(e) => {
            warn!(backend = captioner.name(), error = %e, "Hook generation failed");
            Vec::new()
        }
    }
}
