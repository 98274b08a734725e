//! Common types for the classify module

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::heal::DefectBox;

// ============================================================
// Constants
// ============================================================

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Hooks requested per batch
pub const DEFAULT_HOOK_COUNT: usize = 30;

// ============================================================
// Error Types
// ============================================================

/// Classification and captioning error types
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Transient service failure: {0}")]
    Transient(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No API key configured (set {API_KEY_ENV})")]
    MissingCredentials,

    #[error("Image encode failed: {0}")]
    ImageEncode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClassifyError {
    /// Whether the failure is a quota / rate-limit condition
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ClassifyError::RateLimited(_) => true,
            ClassifyError::Http(e) => e
                .status()
                .is_some_and(|s| s == reqwest::StatusCode::TOO_MANY_REQUESTS),
            ClassifyError::Transient(msg) => looks_like_quota(msg),
            _ => false,
        }
    }
}

/// Quota exhaustion is sometimes only visible in the message text
pub(crate) fn looks_like_quota(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("429") || lower.contains("quota") || lower.contains("resource_exhausted")
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

// ============================================================
// Data Structures
// ============================================================

/// Per-image analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub has_subject: bool,
    pub subject_count: u32,
    pub is_multi_panel: bool,
    pub defect: DefectBox,
}

impl Classification {
    /// One subject, no defect. Used when classification is disabled or unavailable.
    pub fn single_subject() -> Self {
        Self {
            has_subject: true,
            subject_count: 1,
            is_multi_panel: false,
            defect: DefectBox::absent(),
        }
    }

    /// No usable subject. Used after retries are exhausted.
    pub fn no_subject() -> Self {
        Self {
            has_subject: false,
            subject_count: 0,
            is_multi_panel: false,
            defect: DefectBox::absent(),
        }
    }

    /// Subject count is zero whenever there is no subject
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.has_subject {
            self
        } else {
            Self {
                subject_count: 0,
                ..self
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_count_without_subject() {
        let c = Classification {
            has_subject: false,
            subject_count: 2,
            is_multi_panel: true,
            defect: DefectBox::absent(),
        };
        let n = c.normalized();
        assert_eq!(n.subject_count, 0);
        assert!(n.is_multi_panel);
        assert_eq!(Classification::single_subject().normalized().subject_count, 1);
    }

    #[test]
    fn test_fail_safe_has_no_subject() {
        let c = Classification::no_subject();
        assert!(!c.has_subject);
        assert_eq!(c.subject_count, 0);
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(ClassifyError::RateLimited("x".into()).is_rate_limit());
        assert!(ClassifyError::Transient("HTTP 429 Too Many Requests".into()).is_rate_limit());
        assert!(ClassifyError::Transient("Quota exceeded".into()).is_rate_limit());
        assert!(!ClassifyError::Transient("HTTP 503".into()).is_rate_limit());
        assert!(!ClassifyError::InvalidResponse("429".into()).is_rate_limit());
        assert!(!ClassifyError::MissingCredentials.is_rate_limit());
    }

    #[test]
    fn test_missing_credentials_mentions_env() {
        assert!(ClassifyError::MissingCredentials
            .to_string()
            .contains("GEMINI_API_KEY"));
    }
}
